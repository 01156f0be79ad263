use std::fmt;

use nalgebra::{Point2, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use super::solver::{invert_distortion, BackprojectSettings};
use super::{Camera, Extrinsics, Intrinsics, Pinhole};
use crate::error::{ConfigError, Result};
use crate::math;

/// Construction parameters for [`GenFTheta`].
///
/// Coefficient vectors default to empty (no distortion); the pose defaults
/// to identity. Coefficient order is significant: index i is the i-th
/// correction term of its group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenFThetaConfig {
    /// Symmetric radial polynomial in theta^2; the unit zeroth term is
    /// implicit, so `[k1, k2]` means `1 + k1*theta^2 + k2*theta^4`.
    pub radial_sym: Vec<f64>,
    /// Asymmetric radial polynomial in theta^2 (no implicit unit term);
    /// scales the radial Fourier series.
    pub radial_asym: Vec<f64>,
    /// Fourier series in the azimuth angle, interleaved cos/sin pairs.
    /// Length must be even.
    pub radial_fourier: Vec<f64>,
    /// Asymmetric tangential polynomial in theta^2; scales the tangential
    /// Fourier series.
    pub tangential_asym: Vec<f64>,
    /// Fourier series in the azimuth angle for the tangential term.
    /// Length must be even.
    pub tangential_fourier: Vec<f64>,
    /// Axis-angle rotation, world to camera.
    pub rotation: [f64; 3],
    /// Translation, world to camera.
    pub translation: [f64; 3],
    pub backproject: BackprojectSettings,
}

/// Generic f-theta camera.
///
/// The radial variable is the incidence angle theta rather than the
/// tangent-plane radius, which keeps wide fields of view finite. On top of
/// the symmetric equidistant polynomial it carries asymmetric and Fourier
/// correction groups for lenses whose distortion is not circularly
/// symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct GenFTheta {
    pinhole: Pinhole,
    radial_sym: Vec<f64>,
    radial_asym: Vec<f64>,
    radial_fourier: Vec<f64>,
    tangential_asym: Vec<f64>,
    tangential_fourier: Vec<f64>,
    /// Any asymmetric/Fourier group active; skips the azimuth math when not.
    full: bool,
    settings: BackprojectSettings,
}

impl GenFTheta {
    pub fn new(intrinsics: Intrinsics, config: GenFThetaConfig) -> Result<Self> {
        if config.radial_fourier.len() % 2 != 0 {
            return Err(ConfigError::OddFourierLength {
                len: config.radial_fourier.len(),
            }
            .into());
        }
        if config.tangential_fourier.len() % 2 != 0 {
            return Err(ConfigError::OddFourierLength {
                len: config.tangential_fourier.len(),
            }
            .into());
        }
        config.backproject.validate()?;

        let full = !math::all_zero(&config.radial_asym)
            || !math::all_zero(&config.radial_fourier)
            || !math::all_zero(&config.tangential_asym)
            || !math::all_zero(&config.tangential_fourier);

        let extrinsics = Extrinsics::new(
            Vector3::from(config.rotation),
            Vector3::from(config.translation),
        );
        Ok(Self {
            pinhole: Pinhole::new(intrinsics, extrinsics),
            radial_sym: config.radial_sym,
            radial_asym: config.radial_asym,
            radial_fourier: config.radial_fourier,
            tangential_asym: config.tangential_asym,
            tangential_fourier: config.tangential_fourier,
            full,
            settings: config.backproject,
        })
    }

    pub fn radial_dist_sym_coeffs(&self) -> &[f64] {
        &self.radial_sym
    }

    pub fn radial_dist_asym_coeffs(&self) -> &[f64] {
        &self.radial_asym
    }

    pub fn radial_dist_four_coeffs(&self) -> &[f64] {
        &self.radial_fourier
    }

    pub fn tangential_dist_asym_coeffs(&self) -> &[f64] {
        &self.tangential_asym
    }

    pub fn tangential_dist_four_coeffs(&self) -> &[f64] {
        &self.tangential_fourier
    }

    /// Radial scale, tangential scale and the theta scaling at a normalized
    /// tangent-plane point.
    fn evaluate(&self, n: &Vector2<f64>) -> (f64, f64, f64) {
        let r = (n.x * n.x + n.y * n.y).sqrt();
        let theta = r.atan();
        let theta2 = theta * theta;
        // the on-axis ray has no azimuthal direction and maps straight to
        // the principal point
        let ftheta_scale = if r == 0.0 { 0.0 } else { theta / r };

        let mut radial = math::polyval_one(&self.radial_sym, theta2);
        let mut tangential = 0.0;
        if self.full {
            let phi = n.y.atan2(n.x);
            radial += math::polyval(&self.radial_asym, theta2)
                * math::fourier(&self.radial_fourier, phi);
            tangential = math::polyval(&self.tangential_asym, theta2)
                * math::fourier(&self.tangential_fourier, phi);
        }
        (radial, tangential, ftheta_scale)
    }

    /// Forward law on the normalized plane: tangent-plane point to distorted
    /// normalized point in the theta domain.
    fn distort(&self, n: &Vector2<f64>) -> Vector2<f64> {
        let (radial, tangential, ftheta_scale) = self.evaluate(n);
        let x = n.x * ftheta_scale;
        let y = n.y * ftheta_scale;
        Vector2::new(x * radial - y * tangential, y * radial + x * tangential)
    }

    pub(crate) fn inner_pinhole(&self) -> &Pinhole {
        &self.pinhole
    }

    pub(crate) fn settings(&self) -> BackprojectSettings {
        self.settings
    }
}

impl Camera for GenFTheta {
    fn project(&self, world: &Point3<f64>) -> Result<Point2<f64>> {
        let n = self.pinhole.world_to_normalized(world)?;
        Ok(self.pinhole.normalized_to_pixel(&self.distort(&n)))
    }

    fn backproject(&self, pixel: &Point2<f64>) -> Result<Vector3<f64>> {
        let observed = self.pinhole.pixel_to_normalized(pixel);
        if observed.x == 0.0 && observed.y == 0.0 {
            // exact principal point: the ray is the optical axis
            return Ok(self.pinhole.ray_to_world(&observed));
        }
        let n = invert_distortion(observed, &self.settings, |g| Ok(self.distort(g)))?;
        Ok(self.pinhole.ray_to_world(&n))
    }

    fn intrinsics(&self) -> &Intrinsics {
        self.pinhole.intrinsics()
    }

    fn extrinsics(&self) -> &Extrinsics {
        self.pinhole.extrinsics()
    }

    fn model_name(&self) -> &'static str {
        "General FTheta"
    }

    fn pinhole(&self) -> Pinhole {
        self.pinhole.clone()
    }

    fn backproject_settings(&self) -> BackprojectSettings {
        self.settings
    }
}

impl fmt::Display for GenFTheta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} camera model", self.model_name())?;
        super::write_common_params(f, self.intrinsics(), self.extrinsics())?;
        super::write_coeffs(f, "radial distortion (sym)", &self.radial_sym)?;
        super::write_coeffs(f, "radial distortion (asym)", &self.radial_asym)?;
        super::write_coeffs(f, "radial distortion (fourier)", &self.radial_fourier)?;
        super::write_coeffs(f, "tangential distortion (asym)", &self.tangential_asym)?;
        super::write_coeffs(f, "tangential distortion (fourier)", &self.tangential_fourier)
    }
}
