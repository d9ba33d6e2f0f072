use thiserror::Error;

/// An error type for the registration primitives.
#[derive(Debug, Error, PartialEq)]
pub enum RegistrationError {
    /// The parameter vector does not match the number of transform parameters.
    #[error("parameter vector has wrong size: expected {expected}, got {actual}")]
    InvalidParameterCount {
        /// Number of parameters the transform expects.
        expected: usize,
        /// Number of parameters that were provided.
        actual: usize,
    },

    /// A rotation was requested around an axis with zero length.
    #[error("cannot compute rotation matrix from a zero vector")]
    ZeroRotationAxis,
}
