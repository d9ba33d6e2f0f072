use nalgebra::{Matrix3, Matrix4, RealField, RowVector4, SMatrix, SVector, Vector3};

use super::state::AffineState;
use crate::error::RegistrationError;

/// Number of parameters of the affine transform: 9 for the matrix, 3 for the translation.
pub const AFFINE_NUM_PARAMETERS: usize = 12;

/// Parameter vector of the affine transform: the matrix in row-major order followed by the
/// translation.
pub type AffineParameters<T> = SVector<T, AFFINE_NUM_PARAMETERS>;

/// Jacobian of a mapped point with respect to the affine parameters, with shape (3, 12).
pub type AffineJacobian<T> = SMatrix<T, 3, AFFINE_NUM_PARAMETERS>;

/// A 3D affine transform with a configurable centre of rotation.
///
/// Points are mapped as `out = matrix * in + offset` where the offset is derived from the
/// translation, the centre and the matrix:
///
/// `offset = translation + centre - matrix * centre`
///
/// Therefore the centre is a fixed point of the transform when the translation is zero, and
/// the translation parameter stays independent of where the centre is placed. The centre is
/// usually set once from the fixed image geometry before the optimization starts.
///
/// The optimizer facing view is the 12 element parameter vector: the matrix in row-major
/// order followed by the translation. It is always computed from the current matrix and
/// translation and never cached.
///
/// All the methods that mutate the transform take `&mut self`, so mapping points and
/// computing Jacobians from many threads is safe while no parameter update is in flight.
///
/// # Example
///
/// ```
/// use kornia_registration::AffineTransform;
/// use nalgebra::{SVector, Vector3};
///
/// let mut transform = AffineTransform::<f64>::new();
/// transform.set_parameter_vector(&SVector::from_column_slice(&[
///     2.0, 0.0, 0.0, //
///     0.0, 2.0, 0.0, //
///     0.0, 0.0, 2.0, //
///     1.0, 0.0, 0.0,
/// ]));
/// assert_eq!(
///     transform.map_point(&Vector3::new(1.0, 1.0, 1.0)),
///     Vector3::new(3.0, 2.0, 2.0)
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform<T = f32> {
    // linear part
    matrix: Matrix3<T>,
    // raw translation parameter
    translation: Vector3<T>,
    // centre of rotation
    centre: Vector3<T>,
    // derived additive term used for mapping
    offset: Vector3<T>,
}

impl<T: RealField + Copy> Default for AffineTransform<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField + Copy> From<AffineState<T>> for AffineTransform<T> {
    fn from(state: AffineState<T>) -> Self {
        Self::from_state(state)
    }
}

impl<T: RealField + Copy> AffineTransform<T> {
    /// Number of parameters exposed to the optimizer.
    pub const NUM_PARAMETERS: usize = AFFINE_NUM_PARAMETERS;

    /// Create the identity transform with zero translation and the centre at the origin.
    pub fn new() -> Self {
        Self {
            matrix: Matrix3::identity(),
            translation: Vector3::zeros(),
            centre: Vector3::zeros(),
            offset: Vector3::zeros(),
        }
    }

    /// Create the identity transform rotating around the given centre.
    pub fn with_centre(centre: Vector3<T>) -> Self {
        let mut transform = Self::new();
        transform.set_centre(centre);
        transform
    }

    /// Create a transform from its canonical state.
    pub fn from_state(state: AffineState<T>) -> Self {
        let mut transform = Self {
            matrix: Matrix3::from_fn(|r, c| state.matrix[r][c]),
            translation: Vector3::from(state.translation),
            centre: Vector3::from(state.centre),
            offset: Vector3::zeros(),
        };
        transform.compute_offset();
        transform
    }

    /// Get the canonical state of the transform, e.g. to hand it over to a later stage.
    pub fn state(&self) -> AffineState<T> {
        AffineState {
            matrix: std::array::from_fn(|r| std::array::from_fn(|c| self.matrix[(r, c)])),
            translation: self.translation.into(),
            centre: self.centre.into(),
        }
    }

    /// Map a point with the current transform.
    ///
    /// # Arguments
    ///
    /// * `point` - The point to map.
    ///
    /// # Returns
    ///
    /// The mapped point `matrix * point + offset`.
    #[inline]
    pub fn map_point(&self, point: &Vector3<T>) -> Vector3<T> {
        self.matrix * point + self.offset
    }

    /// Map a set of points with the current transform.
    ///
    /// # Arguments
    ///
    /// * `src_points` - The points to map.
    /// * `dst_points` - A pre-allocated buffer to store the mapped points.
    ///
    /// PRECONDITION: dst_points has the same length as src_points.
    pub fn map_points(&self, src_points: &[Vector3<T>], dst_points: &mut [Vector3<T>]) {
        assert_eq!(src_points.len(), dst_points.len());
        for (dst, src) in dst_points.iter_mut().zip(src_points.iter()) {
            *dst = self.map_point(src);
        }
    }

    /// Compute the Jacobian of the mapped point with respect to the parameters.
    ///
    /// The derivatives are taken at `point - centre`. Row `r` holds `point - centre` in the
    /// columns of the matrix row `r` parameters and a one in the column of the translation
    /// along `r`. All other entries are zero.
    ///
    /// # Arguments
    ///
    /// * `point` - The point, before mapping, where the Jacobian is evaluated.
    ///
    /// # Returns
    ///
    /// The Jacobian with shape (3, 12), columns ordered as the parameter vector.
    pub fn jacobian_at(&self, point: &Vector3<T>) -> AffineJacobian<T> {
        let v = (point - self.centre).transpose();
        let mut jacobian = AffineJacobian::zeros();
        for r in 0..3 {
            jacobian.fixed_view_mut::<1, 3>(r, 3 * r).copy_from(&v);
            jacobian[(r, 9 + r)] = T::one();
        }
        jacobian
    }

    /// Set the transform from a 4x4 homogeneous matrix.
    ///
    /// The matrix is read as the effective transform, the same form returned by
    /// [`AffineTransform::homogeneous`]: the upper left 3x3 block becomes the linear part and
    /// the last column becomes the offset. The centre is kept and the translation is solved
    /// from it as `column - centre + matrix * centre`, so exporting and importing again maps
    /// every point the same way.
    ///
    /// This differs from storing the last column as the raw translation whenever the centre
    /// is not the origin. With the centre at the origin both readings agree and the last
    /// column is taken as the translation as is.
    ///
    /// The bottom row is expected to be `[0, 0, 0, 1]`. Any other bottom row is logged at
    /// `warn` level and ignored.
    pub fn set_homogeneous(&mut self, transform: &Matrix4<T>) {
        let (z, o) = (T::zero(), T::one());
        let bottom = transform.fixed_view::<1, 4>(3, 0).into_owned();
        if bottom != RowVector4::new(z, z, z, o) {
            log::warn!(
                "Ignoring non affine bottom row of the homogeneous matrix: {:?}",
                bottom.as_slice()
            );
        }

        self.matrix = transform.fixed_view::<3, 3>(0, 0).into_owned();
        let offset = transform.fixed_view::<3, 1>(0, 3).into_owned();

        self.translation = offset - self.centre + self.matrix * self.centre;
        self.compute_offset();
    }

    /// Get the effective transform as a 4x4 homogeneous matrix.
    ///
    /// The last column holds the offset, not the raw translation.
    pub fn homogeneous(&self) -> Matrix4<T> {
        let mut transform = self.matrix.to_homogeneous();
        transform.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.offset);
        transform
    }

    /// Set the matrix and the translation from the parameter vector.
    ///
    /// # Arguments
    ///
    /// * `parameters` - The matrix in row-major order followed by the translation.
    pub fn set_parameter_vector(&mut self, parameters: &AffineParameters<T>) {
        self.matrix = Matrix3::from_fn(|r, c| parameters[3 * r + c]);
        self.translation = parameters.fixed_rows::<3>(9).into_owned();
        self.compute_offset();
    }

    /// Set the parameter vector from a slice of unknown length.
    ///
    /// Returns an error, leaving the transform untouched, if the slice does not hold exactly
    /// [`AffineTransform::NUM_PARAMETERS`] values.
    pub fn try_set_parameter_vector(&mut self, parameters: &[T]) -> Result<(), RegistrationError> {
        if parameters.len() != AFFINE_NUM_PARAMETERS {
            return Err(RegistrationError::InvalidParameterCount {
                expected: AFFINE_NUM_PARAMETERS,
                actual: parameters.len(),
            });
        }

        self.set_parameter_vector(&AffineParameters::from_column_slice(parameters));
        Ok(())
    }

    /// Get the parameter vector: the matrix in row-major order followed by the translation.
    pub fn parameter_vector(&self) -> AffineParameters<T> {
        AffineParameters::from_fn(|k, _| match k {
            0..=8 => self.matrix[(k / 3, k % 3)],
            _ => self.translation[k - 9],
        })
    }

    /// Number of parameters of the transform.
    #[inline]
    pub fn parameter_count(&self) -> usize {
        Self::NUM_PARAMETERS
    }

    /// Set the linear part of the transform.
    pub fn set_matrix(&mut self, matrix: Matrix3<T>) {
        self.matrix = matrix;
        self.compute_offset();
    }

    /// Get the linear part of the transform.
    pub fn matrix(&self) -> &Matrix3<T> {
        &self.matrix
    }

    /// Set the translation parameter.
    pub fn set_translation(&mut self, translation: Vector3<T>) {
        self.translation = translation;
        self.compute_offset();
    }

    /// Get the translation parameter.
    pub fn translation(&self) -> &Vector3<T> {
        &self.translation
    }

    /// Set the centre of rotation.
    pub fn set_centre(&mut self, centre: Vector3<T>) {
        log::debug!("Setting centre of rotation: {:?}", centre.as_slice());
        self.centre = centre;
        self.compute_offset();
    }

    /// Get the centre of rotation.
    pub fn centre(&self) -> &Vector3<T> {
        &self.centre
    }

    /// Get the offset applied after the linear part when mapping points.
    pub fn offset(&self) -> &Vector3<T> {
        &self.offset
    }

    fn compute_offset(&mut self) {
        self.offset = self.translation + self.centre - self.matrix * self.centre;
    }
}
