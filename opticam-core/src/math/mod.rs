//! Polynomial and Fourier-series evaluation shared by the distortion laws.

/// Evaluate `c[0] + c[1]*x + c[2]*x^2 + ...` by Horner's rule.
///
/// An empty coefficient slice evaluates to zero.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluate a distortion polynomial whose zeroth coefficient is implicitly
/// one: `1 + c[0]*x + c[1]*x^2 + ...`.
///
/// The stored coefficient sets start at the first correction term, so the
/// undistorted case is the empty vector.
pub fn polyval_one(coeffs: &[f64], x: f64) -> f64 {
    1.0 + x * polyval(coeffs, x)
}

/// Evaluate a truncated Fourier series with interleaved coefficients:
/// `c[0]*cos(phi) + c[1]*sin(phi) + c[2]*cos(2*phi) + c[3]*sin(2*phi) + ...`
///
/// The slice length must be even; an empty slice evaluates to zero.
pub fn fourier(coeffs: &[f64], phi: f64) -> f64 {
    coeffs
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let angle = (i + 1) as f64 * phi;
            pair[0] * angle.cos() + pair[1] * angle.sin()
        })
        .sum()
}

/// True when every coefficient is exactly zero. Empty counts as zero, so a
/// coefficient group can be disabled either way.
pub fn all_zero(coeffs: &[f64]) -> bool {
    coeffs.iter().all(|&c| c == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyval_empty() {
        assert_eq!(polyval(&[], 3.0), 0.0);
    }

    #[test]
    fn test_polyval_cubic() {
        // 2 - x + 3x^2 at x = 2
        let value = polyval(&[2.0, -1.0, 3.0], 2.0);
        assert!((value - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_polyval_one_is_identity_when_empty() {
        assert_eq!(polyval_one(&[], 0.7), 1.0);
    }

    #[test]
    fn test_polyval_one_leading_term() {
        // 1 + 0.1 x + 0.01 x^2 at x = 2
        let value = polyval_one(&[0.1, 0.01], 2.0);
        assert!((value - 1.24).abs() < 1e-12);
    }

    #[test]
    fn test_fourier_first_harmonic() {
        let phi = 0.3_f64;
        let value = fourier(&[2.0, -1.0], phi);
        assert!((value - (2.0 * phi.cos() - phi.sin())).abs() < 1e-12);
    }

    #[test]
    fn test_fourier_second_harmonic() {
        let phi = 1.1_f64;
        let value = fourier(&[0.0, 0.0, 1.5, 0.5], phi);
        let expected = 1.5 * (2.0 * phi).cos() + 0.5 * (2.0 * phi).sin();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fourier_empty() {
        assert_eq!(fourier(&[], 0.4), 0.0);
    }

    #[test]
    fn test_all_zero() {
        assert!(all_zero(&[]));
        assert!(all_zero(&[0.0, 0.0]));
        assert!(!all_zero(&[0.0, 1e-9]));
    }
}
