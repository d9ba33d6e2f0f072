/// Affine transform with a configurable centre of rotation.
pub mod affine;

/// Serializable state of the affine transform.
pub mod state;

pub use affine::{AffineJacobian, AffineParameters, AffineTransform, AFFINE_NUM_PARAMETERS};
pub use state::AffineState;
