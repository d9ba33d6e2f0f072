#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia Registration
//!
//! Per-point building blocks for iterative, intensity-based image registration:
//!
//! - [`AffineTransform`]: a 12 parameter affine transform with a configurable rotation centre
//!   and an analytic Jacobian with respect to its parameters.
//! - [`IntensityDifference`]: the point-wise residual `fixed - moving` between two image samples.
//!
//! The optimizer loop, image sampling and aggregation of gradients live outside this crate.
//!
//! ## Example
//!
//! ```rust
//! use kornia_registration::{AffineTransform, IntensityDifference, RegistrationSample};
//! use nalgebra::Vector3;
//!
//! struct Sample {
//!     fixed: f64,
//!     moving: f64,
//! }
//!
//! impl RegistrationSample<f64> for Sample {
//!     type Error = std::convert::Infallible;
//!
//!     fn fixed_image_value(&self) -> Result<f64, Self::Error> {
//!         Ok(self.fixed)
//!     }
//!
//!     fn moving_image_value(&self) -> Result<f64, Self::Error> {
//!         Ok(self.moving)
//!     }
//! }
//!
//! let centre = Vector3::new(1.0, 1.0, 1.0);
//! let mut transform = AffineTransform::<f64>::with_centre(centre);
//! transform.set_translation(Vector3::new(0.5, 0.0, 0.0));
//!
//! // the centre maps onto itself plus the translation
//! assert_eq!(transform.map_point(&centre), Vector3::new(1.5, 1.0, 1.0));
//!
//! let residual: f64 = IntensityDifference.evaluate(&Sample { fixed: 5.0, moving: 3.0 }).unwrap();
//! assert_eq!(residual, 2.0);
//! ```

/// Error types for the registration primitives.
pub mod error;

pub mod metric;

/// Rotation matrix construction helpers.
pub mod rotation;

/// Capabilities a sampling layer exposes to the metrics.
pub mod sample;

/// Parametric spatial transforms.
pub mod transform;

pub use error::RegistrationError;
pub use metric::IntensityDifference;
pub use sample::{GradientSample, RegistrationSample};
pub use transform::{AffineState, AffineTransform};
