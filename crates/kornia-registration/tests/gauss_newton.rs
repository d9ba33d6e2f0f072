use approx::assert_relative_eq;
use faer::prelude::SpSolverLstsq;
use kornia_registration::{
    rotation::axis_angle_to_rotation_matrix,
    transform::{AffineParameters, AFFINE_NUM_PARAMETERS},
    AffineTransform, GradientSample, IntensityDifference, RegistrationSample,
};
use nalgebra::Vector3;

#[derive(Debug)]
struct OutOfBounds;

impl std::fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sample outside of the moving image")
    }
}

impl std::error::Error for OutOfBounds {}

// smooth synthetic moving image defined on [-20, 20]^3
const EXTENT: f64 = 20.0;

const WAVES: [[f64; 3]; 4] = [
    [0.3, 0.1, 0.0],
    [0.0, 0.2, -0.25],
    [0.15, 0.0, 0.3],
    [0.12, -0.18, 0.1],
];

fn moving_image(y: &Vector3<f64>) -> f64 {
    WAVES
        .iter()
        .map(|k| Vector3::from(*k).dot(y).sin())
        .sum()
}

fn moving_image_gradient(y: &Vector3<f64>) -> Vector3<f64> {
    WAVES.iter().fold(Vector3::zeros(), |gradient, k| {
        let k = Vector3::from(*k);
        gradient + k * k.dot(y).cos()
    })
}

/// A sample of the fixed image paired with the moving image at the mapped point.
struct Sample {
    fixed: f64,
    mapped: Vector3<f64>,
}

impl Sample {
    fn inside(&self) -> Result<(), OutOfBounds> {
        match self.mapped.iter().all(|v| v.abs() <= EXTENT) {
            true => Ok(()),
            false => Err(OutOfBounds),
        }
    }
}

impl RegistrationSample<f64> for Sample {
    type Error = OutOfBounds;

    fn fixed_image_value(&self) -> Result<f64, Self::Error> {
        Ok(self.fixed)
    }

    fn moving_image_value(&self) -> Result<f64, Self::Error> {
        self.inside()?;
        Ok(moving_image(&self.mapped))
    }
}

impl GradientSample<f64> for Sample {
    fn moving_image_gradient(&self) -> Result<Vector3<f64>, Self::Error> {
        self.inside()?;
        Ok(moving_image_gradient(&self.mapped))
    }
}

fn sample_points() -> Vec<Vector3<f64>> {
    let steps = [-4.0, -2.0, 0.0, 2.0, 4.0];
    let mut points = Vec::new();
    for x in steps {
        for y in steps {
            for z in steps {
                points.push(Vector3::new(x, y, z));
            }
        }
    }
    points
}

fn ground_truth(
    centre: Vector3<f64>,
) -> Result<AffineTransform<f64>, Box<dyn std::error::Error>> {
    let rotation = axis_angle_to_rotation_matrix(&Vector3::new(0.2, 1.0, 0.3), 0.08)?;

    let mut transform = AffineTransform::with_centre(centre);
    transform.set_matrix(rotation * 1.03);
    transform.set_translation(Vector3::new(0.4, -0.3, 0.2));
    Ok(transform)
}

#[test]
fn test_gauss_newton_recovers_affine() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();

    let centre = Vector3::new(0.5, 0.5, 0.5);
    let truth = ground_truth(centre)?;

    // fixed image: the moving image seen through the true transform
    let points = sample_points();
    let fixed_values = points
        .iter()
        .map(|p| moving_image(&truth.map_point(p)))
        .collect::<Vec<_>>();

    let metric = IntensityDifference;
    let mut transform = AffineTransform::<f64>::with_centre(centre);
    let mut initial_cost = None;
    let mut cost = f64::INFINITY;

    for iteration in 0..20 {
        let mut rows = Vec::with_capacity(points.len());
        let mut residuals = Vec::with_capacity(points.len());
        let mut gradient = AffineParameters::zeros();

        for (point, fixed) in points.iter().zip(fixed_values.iter()) {
            let sample = Sample {
                fixed: *fixed,
                mapped: transform.map_point(point),
            };
            let jacobian = transform.jacobian_at(point);
            let residual = metric.evaluate_with_gradient(&sample, &jacobian, &mut gradient)?;
            rows.push(metric.residual_jacobian(&sample, &jacobian)?);
            residuals.push(residual);
        }

        cost = 0.5 * residuals.iter().map(|r| r * r).sum::<f64>();
        initial_cost.get_or_insert(cost);
        log::debug!("Iteration: {} cost: {:e}", iteration, cost);
        if cost < 1e-20 {
            break;
        }

        // solve the linearized least squares problem J * delta = -r
        let mat_a =
            faer::Mat::<f64>::from_fn(rows.len(), AFFINE_NUM_PARAMETERS, |i, k| rows[i][k]);
        let mat_b = faer::Mat::<f64>::from_fn(residuals.len(), 1, |i, _| -residuals[i]);
        let delta = mat_a.qr().solve_lstsq(mat_b);

        let step = AffineParameters::from_fn(|k, _| delta.read(k, 0));

        // the step must be a descent direction of the accumulated gradient
        assert!(step.dot(&gradient) <= 0.0);

        transform.set_parameter_vector(&(transform.parameter_vector() + step));
    }

    assert!(cost < initial_cost.unwrap_or(f64::INFINITY));
    assert!(cost < 1e-12);

    assert_relative_eq!(
        transform.parameter_vector(),
        truth.parameter_vector(),
        epsilon = 1e-6
    );

    // the exported homogeneous matrix agrees with the ground truth
    assert_relative_eq!(transform.homogeneous(), truth.homogeneous(), epsilon = 1e-6);

    Ok(())
}

#[test]
fn test_out_of_bounds_sample_is_reported() {
    let mut transform = AffineTransform::<f64>::new();
    transform.set_translation(Vector3::new(25.0, 0.0, 0.0));

    let origin = Vector3::zeros();
    let sample = Sample {
        fixed: 0.0,
        mapped: transform.map_point(&origin),
    };
    let mut gradient = AffineParameters::zeros();
    let result = IntensityDifference.evaluate_with_gradient(
        &sample,
        &transform.jacobian_at(&origin),
        &mut gradient,
    );

    assert!(matches!(result, Err(OutOfBounds)));
    assert_eq!(gradient, AffineParameters::zeros());
}
