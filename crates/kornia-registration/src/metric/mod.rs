//! Similarity metrics evaluated at a single sample point.
//!
//! A metric turns the intensities of one [`crate::RegistrationSample`] into a residual.
//! Summing residuals and gradient contributions over many samples is left to the optimizer.
//!
//! # Available Metrics
//!
//! - **Intensity difference**: `fixed - moving`, the residual of a sum of squared differences
//!   cost.

mod intensity_difference;

pub use intensity_difference::IntensityDifference;
