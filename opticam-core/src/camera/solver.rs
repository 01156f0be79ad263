//! Shared iterative inverse for the distortion laws with no closed-form
//! inverse.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{CameraError, ConfigError, ConvergenceError, DomainError};

/// Iteration budget and convergence tolerance for the iterative
/// inverse-distortion solve.
///
/// The defaults suit the smoothly-distorted polynomial models; callers with
/// ill-conditioned calibrations can widen the budget or tighten the
/// tolerance per model at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackprojectSettings {
    /// Per-component residual below which the solve is accepted.
    pub tolerance: f64,
    /// Hard cap on Newton iterations before reporting failure.
    pub max_iterations: usize,
}

impl BackprojectSettings {
    pub fn new(tolerance: f64, max_iterations: usize) -> Result<Self, ConfigError> {
        let settings = Self {
            tolerance,
            max_iterations,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(ConfigError::BadTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}

impl Default for BackprojectSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 20,
        }
    }
}

// Finite-difference step for the Jacobian of the forward law.
const JACOBIAN_STEP: f64 = 1e-6;
const DET_EPS: f64 = 1e-14;

/// Invert a forward distortion law by Newton iteration on the normalized
/// plane.
///
/// `forward` maps undistorted normalized coordinates to distorted ones;
/// `target` is the observed distorted coordinate and doubles as the initial
/// guess, which is close for small-to-moderate distortion. Deterministic:
/// same inputs and settings always walk the same path.
pub(crate) fn invert_distortion<F>(
    target: Vector2<f64>,
    settings: &BackprojectSettings,
    forward: F,
) -> Result<Vector2<f64>, CameraError>
where
    F: Fn(&Vector2<f64>) -> Result<Vector2<f64>, DomainError>,
{
    let mut guess = target;
    let mut residual = f64::INFINITY;

    for _ in 0..settings.max_iterations {
        let value = forward(&guess)?;
        let err = target - value;
        residual = err.x.abs().max(err.y.abs());
        if residual < settings.tolerance {
            return Ok(guess);
        }

        // Finite-difference Jacobian of the forward law
        let fx = forward(&Vector2::new(guess.x + JACOBIAN_STEP, guess.y))?;
        let fy = forward(&Vector2::new(guess.x, guess.y + JACOBIAN_STEP))?;
        let j11 = (fx.x - value.x) / JACOBIAN_STEP;
        let j21 = (fx.y - value.y) / JACOBIAN_STEP;
        let j12 = (fy.x - value.x) / JACOBIAN_STEP;
        let j22 = (fy.y - value.y) / JACOBIAN_STEP;

        // Solve J * delta = err
        let det = j11 * j22 - j12 * j21;
        if det.abs() < DET_EPS {
            return Err(DomainError::SingularJacobian {
                x: guess.x,
                y: guess.y,
            }
            .into());
        }

        guess.x += (j22 * err.x - j12 * err.y) / det;
        guess.y += (j11 * err.y - j21 * err.x) / det;
    }

    Err(ConvergenceError {
        iterations: settings.max_iterations,
        residual,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = BackprojectSettings::default();
        assert_eq!(settings.max_iterations, 20);
        assert_eq!(settings.tolerance, 1e-6);
    }

    #[test]
    fn test_settings_reject_bad_values() {
        assert!(matches!(
            BackprojectSettings::new(0.0, 20),
            Err(ConfigError::BadTolerance(_))
        ));
        assert!(matches!(
            BackprojectSettings::new(1e-6, 0),
            Err(ConfigError::ZeroIterations)
        ));
    }

    #[test]
    fn test_inverts_identity_immediately() {
        let target = Vector2::new(0.3, -0.2);
        let result =
            invert_distortion(target, &BackprojectSettings::default(), |n| Ok(*n)).unwrap();
        assert!((result - target).norm() < 1e-12);
    }

    #[test]
    fn test_inverts_radial_scaling() {
        // forward law: n * (1 + 0.1 r^2)
        let forward = |n: &Vector2<f64>| {
            let r2 = n.norm_squared();
            Ok(n * (1.0 + 0.1 * r2))
        };
        let undistorted = Vector2::new(0.4, 0.25);
        let distorted = forward(&undistorted).unwrap();
        let solved =
            invert_distortion(distorted, &BackprojectSettings::default(), forward).unwrap();
        assert!((solved - undistorted).norm() < 1e-6);
    }

    #[test]
    fn test_reports_non_convergence() {
        // Violent distortion far outside the stable region, with a budget
        // too small to walk back to the solution
        let forward = |n: &Vector2<f64>| {
            let r2 = n.norm_squared();
            Ok(n * (1.0 + 1e6 * r2))
        };
        let settings = BackprojectSettings {
            tolerance: 1e-12,
            max_iterations: 5,
        };
        let result = invert_distortion(Vector2::new(10.0, 10.0), &settings, forward);
        assert!(matches!(result, Err(CameraError::Convergence(_))));
    }

    #[test]
    fn test_propagates_domain_error() {
        let forward = |_: &Vector2<f64>| Err(DomainError::SingularDenominator { r2: 1.0 });
        let result = invert_distortion(
            Vector2::new(1.0, 0.0),
            &BackprojectSettings::default(),
            forward,
        );
        assert!(matches!(result, Err(CameraError::Domain(_))));
    }

    #[test]
    fn test_singular_jacobian_is_domain_error() {
        // Constant forward law: Jacobian is identically zero
        let forward = |_: &Vector2<f64>| Ok(Vector2::new(0.5, 0.5));
        let result = invert_distortion(
            Vector2::new(1.0, 0.0),
            &BackprojectSettings::default(),
            forward,
        );
        assert!(matches!(
            result,
            Err(CameraError::Domain(DomainError::SingularJacobian { .. }))
        ));
    }
}
