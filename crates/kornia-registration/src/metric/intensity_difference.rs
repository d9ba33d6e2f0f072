use nalgebra::{RealField, SMatrix, SVector};

use crate::sample::{GradientSample, RegistrationSample};

/// Point-wise intensity difference between the fixed and the moving image.
///
/// The residual at one sample is defined as:
///
/// $ r = F(x) - M(T(x)) $
///
/// where `F` is the fixed image, `M` the moving image and `T` the transform. Minimizing
/// $ \frac{1}{2} \sum r^2 $ over all samples gives a sum of squared differences
/// registration.
///
/// [`IntensityDifference::evaluate`] only returns the residual. Callers that want the
/// gradient contribution of the sample either combine the residual with the transform
/// Jacobian themselves or use [`IntensityDifference::evaluate_with_gradient`].
///
/// # Example
///
/// ```
/// use kornia_registration::{IntensityDifference, RegistrationSample};
///
/// struct Sample;
///
/// impl RegistrationSample<f32> for Sample {
///     type Error = std::convert::Infallible;
///
///     fn fixed_image_value(&self) -> Result<f32, Self::Error> {
///         Ok(5.0)
///     }
///
///     fn moving_image_value(&self) -> Result<f32, Self::Error> {
///         Ok(3.0)
///     }
/// }
///
/// let residual: f32 = IntensityDifference.evaluate(&Sample).unwrap();
/// assert_eq!(residual, 2.0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntensityDifference;

impl IntensityDifference {
    /// Compute the residual `fixed - moving` at the given sample.
    ///
    /// # Errors
    ///
    /// Errors from the sampling layer are returned unchanged.
    pub fn evaluate<T, S>(&self, sample: &S) -> Result<T, S::Error>
    where
        T: RealField + Copy,
        S: RegistrationSample<T>,
    {
        Ok(sample.fixed_image_value()? - sample.moving_image_value()?)
    }

    /// Compute the derivative of the residual with respect to the transform parameters.
    ///
    /// Since only the moving image depends on the parameters:
    ///
    /// $ \frac{\partial r}{\partial p} = - \nabla M \cdot J $
    ///
    /// # Arguments
    ///
    /// * `sample` - The sample, exposing the moving image gradient at the mapped point.
    /// * `jacobian` - The Jacobian of the mapped point with respect to the parameters, with
    ///   shape (3, N), e.g. from [`crate::AffineTransform::jacobian_at`].
    pub fn residual_jacobian<T, S, const N: usize>(
        &self,
        sample: &S,
        jacobian: &SMatrix<T, 3, N>,
    ) -> Result<SVector<T, N>, S::Error>
    where
        T: RealField + Copy,
        S: GradientSample<T>,
    {
        let gradient = sample.moving_image_gradient()?;
        Ok(-(jacobian.transpose() * gradient))
    }

    /// Compute the residual and add the sample contribution to an accumulated gradient.
    ///
    /// The contribution is the gradient of $ \frac{1}{2} r^2 $, that is `r * dr/dp`. The
    /// accumulator is left untouched when sampling fails.
    ///
    /// # Arguments
    ///
    /// * `sample` - The sample, exposing the moving image gradient at the mapped point.
    /// * `jacobian` - The Jacobian of the mapped point with respect to the parameters.
    /// * `gradient` - The accumulated gradient, one entry per parameter.
    ///
    /// # Returns
    ///
    /// The residual at the sample.
    pub fn evaluate_with_gradient<T, S, const N: usize>(
        &self,
        sample: &S,
        jacobian: &SMatrix<T, 3, N>,
        gradient: &mut SVector<T, N>,
    ) -> Result<T, S::Error>
    where
        T: RealField + Copy,
        S: GradientSample<T>,
    {
        let residual = self.evaluate(sample)?;
        let derivative = self.residual_jacobian(sample, jacobian)?;
        *gradient += derivative * residual;
        Ok(residual)
    }
}
