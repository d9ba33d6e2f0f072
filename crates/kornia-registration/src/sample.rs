use nalgebra::Vector3;

/// A single corresponding point pair between the fixed and the moving image.
///
/// Implemented by the sampling layer that owns the images and the interpolation. The
/// moving image value is expected to be taken at the point already mapped by the transform.
///
/// Sampling may fail, e.g. when the mapped point falls outside the moving image. Such errors
/// are reported through [`RegistrationSample::Error`] and are passed through the metrics
/// unchanged.
pub trait RegistrationSample<T> {
    /// Error raised by the sampling layer.
    type Error;

    /// Intensity of the fixed image at the sample point.
    fn fixed_image_value(&self) -> Result<T, Self::Error>;

    /// Intensity of the moving image at the mapped sample point.
    fn moving_image_value(&self) -> Result<T, Self::Error>;
}

/// A sample that also exposes the spatial gradient of the moving image.
pub trait GradientSample<T>: RegistrationSample<T> {
    /// Gradient of the moving image intensity at the mapped sample point, in moving image
    /// coordinates.
    fn moving_image_gradient(&self) -> Result<Vector3<T>, Self::Error>;
}
