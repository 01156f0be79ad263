use std::fmt;

use nalgebra::{Point2, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use super::solver::{invert_distortion, BackprojectSettings};
use super::{Camera, Extrinsics, Intrinsics, Pinhole};
use crate::error::{ConfigError, DomainError, Result};
use crate::math;

// Denominator magnitude below which the rational scale is treated as
// singular.
const DEN_EPS: f64 = 1e-12;

/// Construction parameters for [`GenFTanTheta`].
///
/// All coefficient vectors default to empty, which disables the group they
/// belong to; the pose defaults to identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenFTanThetaConfig {
    /// Radial numerator polynomial in r^2, implicit unit zeroth term.
    pub radial_num: Vec<f64>,
    /// Radial denominator polynomial in r^2, implicit unit zeroth term.
    pub radial_den: Vec<f64>,
    /// Classic tangential coefficients `[p1, p2]`; empty disables the term.
    pub tangential: Vec<f64>,
    /// Polynomial in r^2 scaling the tangential term, implicit unit zeroth
    /// term; empty leaves the term unscaled.
    pub tangential_poly: Vec<f64>,
    /// Additive thin-prism coefficients `[o1, o2, o3, o4]`; empty disables
    /// the term.
    pub tangential_ocv: Vec<f64>,
    /// Axis-angle rotation, world to camera.
    pub rotation: [f64; 3],
    /// Translation, world to camera.
    pub translation: [f64; 3],
    pub backproject: BackprojectSettings,
}

/// Generic rational f-tan-theta camera.
///
/// The radial variable is the tangent-plane radius, scaled by a rational
/// polynomial in r^2. Tangential decentering and additive thin-prism groups
/// extend the classic Brown-Conrady law.
#[derive(Debug, Clone, PartialEq)]
pub struct GenFTanTheta {
    pinhole: Pinhole,
    radial_num: Vec<f64>,
    radial_den: Vec<f64>,
    tangential: Vec<f64>,
    tangential_poly: Vec<f64>,
    tangential_ocv: Vec<f64>,
    has_den: bool,
    has_tangential: bool,
    has_ocv: bool,
    settings: BackprojectSettings,
}

impl GenFTanTheta {
    pub fn new(intrinsics: Intrinsics, config: GenFTanThetaConfig) -> Result<Self> {
        if !config.tangential.is_empty() && config.tangential.len() != 2 {
            return Err(ConfigError::BadTangentialLength {
                len: config.tangential.len(),
            }
            .into());
        }
        if !config.tangential_ocv.is_empty() && config.tangential_ocv.len() != 4 {
            return Err(ConfigError::BadOcvLength {
                len: config.tangential_ocv.len(),
            }
            .into());
        }
        config.backproject.validate()?;

        let has_den = !math::all_zero(&config.radial_den);
        let has_tangential = !math::all_zero(&config.tangential);
        let has_ocv = !math::all_zero(&config.tangential_ocv);

        let extrinsics = Extrinsics::new(
            Vector3::from(config.rotation),
            Vector3::from(config.translation),
        );
        Ok(Self {
            pinhole: Pinhole::new(intrinsics, extrinsics),
            radial_num: config.radial_num,
            radial_den: config.radial_den,
            tangential: config.tangential,
            tangential_poly: config.tangential_poly,
            tangential_ocv: config.tangential_ocv,
            has_den,
            has_tangential,
            has_ocv,
            settings: config.backproject,
        })
    }

    pub fn radial_dist_num_coeffs(&self) -> &[f64] {
        &self.radial_num
    }

    pub fn radial_dist_den_coeffs(&self) -> &[f64] {
        &self.radial_den
    }

    pub fn tangential_dist_coeffs(&self) -> &[f64] {
        &self.tangential
    }

    pub fn tangential_dist_poly_coeffs(&self) -> &[f64] {
        &self.tangential_poly
    }

    pub fn tangential_dist_ocv_coeffs(&self) -> &[f64] {
        &self.tangential_ocv
    }

    /// Forward law on the normalized plane.
    ///
    /// Fails when the rational radial scale has a root at this radius; such
    /// a calibration maps the point to infinity.
    pub(crate) fn distort(
        &self,
        n: &Vector2<f64>,
    ) -> std::result::Result<Vector2<f64>, DomainError> {
        let r2 = n.x * n.x + n.y * n.y;

        let mut scale = math::polyval_one(&self.radial_num, r2);
        if self.has_den {
            let den = math::polyval_one(&self.radial_den, r2);
            if den.abs() < DEN_EPS {
                return Err(DomainError::SingularDenominator { r2 });
            }
            scale /= den;
        }

        let mut x = n.x * scale;
        let mut y = n.y * scale;

        if self.has_tangential {
            let p1 = self.tangential[0];
            let p2 = self.tangential[1];
            let poly = math::polyval_one(&self.tangential_poly, r2);
            x += (2.0 * p1 * n.x * n.y + p2 * (r2 + 2.0 * n.x * n.x)) * poly;
            y += (p1 * (r2 + 2.0 * n.y * n.y) + 2.0 * p2 * n.x * n.y) * poly;
        }

        if self.has_ocv {
            let o = &self.tangential_ocv;
            let r4 = r2 * r2;
            x += o[0] * r2 + o[1] * r4;
            y += o[2] * r2 + o[3] * r4;
        }

        Ok(Vector2::new(x, y))
    }

    pub(crate) fn inner_pinhole(&self) -> &Pinhole {
        &self.pinhole
    }

    pub(crate) fn settings(&self) -> BackprojectSettings {
        self.settings
    }
}

impl Camera for GenFTanTheta {
    fn project(&self, world: &Point3<f64>) -> Result<Point2<f64>> {
        let n = self.pinhole.world_to_normalized(world)?;
        let d = self.distort(&n)?;
        Ok(self.pinhole.normalized_to_pixel(&d))
    }

    fn backproject(&self, pixel: &Point2<f64>) -> Result<Vector3<f64>> {
        let observed = self.pinhole.pixel_to_normalized(pixel);
        let n = invert_distortion(observed, &self.settings, |g| self.distort(g))?;
        Ok(self.pinhole.ray_to_world(&n))
    }

    fn intrinsics(&self) -> &Intrinsics {
        self.pinhole.intrinsics()
    }

    fn extrinsics(&self) -> &Extrinsics {
        self.pinhole.extrinsics()
    }

    fn model_name(&self) -> &'static str {
        "General FTan Theta"
    }

    fn pinhole(&self) -> Pinhole {
        self.pinhole.clone()
    }

    fn backproject_settings(&self) -> BackprojectSettings {
        self.settings
    }
}

impl fmt::Display for GenFTanTheta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} camera model", self.model_name())?;
        super::write_common_params(f, self.intrinsics(), self.extrinsics())?;
        super::write_coeffs(f, "radial distortion (num)", &self.radial_num)?;
        super::write_coeffs(f, "radial distortion (den)", &self.radial_den)?;
        super::write_coeffs(f, "tangential distortion", &self.tangential)?;
        super::write_coeffs(f, "tangential distortion (poly)", &self.tangential_poly)?;
        super::write_coeffs(f, "tangential distortion (ocv)", &self.tangential_ocv)
    }
}
