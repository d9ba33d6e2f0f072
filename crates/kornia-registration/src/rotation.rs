use nalgebra::{Matrix3, RealField, Rotation3, Unit, Vector3};

use crate::error::RegistrationError;

/// Compute the rotation matrix from an axis and angle.
///
/// # Arguments
///
/// * `axis` - The axis of rotation. It does not need to be normalized.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix, ready to be passed to [`crate::AffineTransform::set_matrix`].
///
/// Example:
///
/// ```
/// use kornia_registration::rotation::axis_angle_to_rotation_matrix;
/// use nalgebra::{Matrix3, Vector3};
///
/// let rotation = axis_angle_to_rotation_matrix(&Vector3::z(), 0.0f64).unwrap();
/// assert_eq!(rotation, Matrix3::identity());
/// ```
pub fn axis_angle_to_rotation_matrix<T: RealField + Copy>(
    axis: &Vector3<T>,
    angle: T,
) -> Result<Matrix3<T>, RegistrationError> {
    let axis =
        Unit::try_new(*axis, T::default_epsilon()).ok_or(RegistrationError::ZeroRotationAxis)?;
    Ok(Rotation3::from_axis_angle(&axis, angle).into_inner())
}
