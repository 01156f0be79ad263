use thiserror::Error;

/// Input outside the mathematically valid domain of a transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("point is on or behind the camera plane (z = {z})")]
    BehindCamera { z: f64 },

    #[error("radial denominator polynomial vanishes at r^2 = {r2}")]
    SingularDenominator { r2: f64 },

    #[error("distortion Jacobian is singular near ({x}, {y})")]
    SingularJacobian { x: f64, y: f64 },
}

/// The iterative inverse-distortion solver exhausted its iteration budget.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("inverse distortion did not converge after {iterations} iterations (residual {residual:e})")]
pub struct ConvergenceError {
    pub iterations: usize,
    pub residual: f64,
}

/// Malformed construction parameters. Raised eagerly at model construction,
/// never at projection time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("focal length must be finite and non-zero, got ({fx}, {fy})")]
    InvalidFocalLength { fx: f64, fy: f64 },

    #[error("image size must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Fourier coefficient vector must have even length, got {len}")]
    OddFourierLength { len: usize },

    #[error("tangential coefficient vector must have length 0 or 2, got {len}")]
    BadTangentialLength { len: usize },

    #[error("OpenCV tangential coefficient vector must have length 0 or 4, got {len}")]
    BadOcvLength { len: usize },

    #[error("{model} does not support a non-zero skew term, got {skew}")]
    SkewNotSupported { model: &'static str, skew: f64 },

    #[error("backproject tolerance must be positive and finite, got {0}")]
    BadTolerance(f64),

    #[error("backproject iteration count must be greater than zero")]
    ZeroIterations,
}

/// Common error type across the camera core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("convergence error: {0}")]
    Convergence(#[from] ConvergenceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, CameraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::BehindCamera { z: -2.0 };
        assert_eq!(
            err.to_string(),
            "point is on or behind the camera plane (z = -2)"
        );

        let err = DomainError::SingularDenominator { r2: 1.0 };
        assert_eq!(
            err.to_string(),
            "radial denominator polynomial vanishes at r^2 = 1"
        );
    }

    #[test]
    fn test_convergence_error_display() {
        let err = ConvergenceError {
            iterations: 20,
            residual: 0.5,
        };
        assert_eq!(
            err.to_string(),
            "inverse distortion did not converge after 20 iterations (residual 5e-1)"
        );
    }

    #[test]
    fn test_camera_error_from_domain_error() {
        let err: CameraError = DomainError::BehindCamera { z: 0.0 }.into();
        assert!(matches!(err, CameraError::Domain(_)));
    }

    #[test]
    fn test_camera_error_from_convergence_error() {
        let err: CameraError = ConvergenceError {
            iterations: 5,
            residual: 1.0,
        }
        .into();
        assert!(matches!(err, CameraError::Convergence(_)));
    }

    #[test]
    fn test_camera_error_from_config_error() {
        let err: CameraError = ConfigError::ZeroIterations.into();
        assert!(matches!(err, CameraError::Config(_)));
        assert_eq!(
            err.to_string(),
            "configuration error: backproject iteration count must be greater than zero"
        );
    }
}
