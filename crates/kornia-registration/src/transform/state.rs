use serde::{Deserialize, Serialize};

/// Canonical state of an [`crate::AffineTransform`].
///
/// Used to hand a transform over between registration stages, e.g. to initialize a finer
/// level from the result of a coarser one. The offset is derived data and is recomputed when
/// the state is turned back into a transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineState<T> {
    /// Linear part in row-major order.
    pub matrix: [[T; 3]; 3],
    /// Translation parameter.
    pub translation: [T; 3],
    /// Centre of rotation.
    pub centre: [T; 3],
}
