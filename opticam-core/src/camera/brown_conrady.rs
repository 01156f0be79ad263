use std::fmt;

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::solver::BackprojectSettings;
use super::{Camera, Extrinsics, GenFTanTheta, GenFTanThetaConfig, Intrinsics, Pinhole};
use crate::error::{ConfigError, Result};

/// Construction parameters for [`BrownConrady`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrownConradyConfig {
    /// Radial polynomial in r^2, implicit unit zeroth term.
    pub radial: Vec<f64>,
    /// Classic tangential coefficients `[p1, p2]`; empty disables the term.
    pub tangential: Vec<f64>,
    /// Polynomial in r^2 scaling the tangential term, implicit unit zeroth
    /// term.
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

/// Brown-Conrady camera.
///
/// A restriction of [`GenFTanTheta`]: a plain radial polynomial with no
/// rational denominator, and the skew term pinned to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BrownConrady {
    inner: GenFTanTheta,
}

impl BrownConrady {
    pub fn new(intrinsics: Intrinsics, config: BrownConradyConfig) -> Result<Self> {
        if intrinsics.skew() != 0.0 {
            return Err(ConfigError::SkewNotSupported {
                model: "Brown Conrady",
                skew: intrinsics.skew(),
            }
            .into());
        }
        let inner = GenFTanTheta::new(
            intrinsics,
            GenFTanThetaConfig {
                radial_num: config.radial,
                radial_den: Vec::new(),
                tangential: config.tangential,
                tangential_poly: config.tangential_poly,
                tangential_ocv: config.tangential_ocv,
                rotation: config.rotation,
                translation: config.translation,
                backproject: config.backproject,
            },
        )?;
        Ok(Self { inner })
    }

    pub fn radial_dist_coeffs(&self) -> &[f64] {
        self.inner.radial_dist_num_coeffs()
    }

    pub fn tangential_dist_coeffs(&self) -> &[f64] {
        self.inner.tangential_dist_coeffs()
    }

    pub fn tangential_dist_poly_coeffs(&self) -> &[f64] {
        self.inner.tangential_dist_poly_coeffs()
    }

    pub fn tangential_dist_ocv_coeffs(&self) -> &[f64] {
        self.inner.tangential_dist_ocv_coeffs()
    }
}

impl Camera for BrownConrady {
    fn project(&self, world: &Point3<f64>) -> Result<Point2<f64>> {
        self.inner.project(world)
    }

    fn backproject(&self, pixel: &Point2<f64>) -> Result<Vector3<f64>> {
        self.inner.backproject(pixel)
    }

    fn intrinsics(&self) -> &Intrinsics {
        self.inner.intrinsics()
    }

    fn extrinsics(&self) -> &Extrinsics {
        self.inner.extrinsics()
    }

    fn model_name(&self) -> &'static str {
        "Brown Conrady"
    }

    fn pinhole(&self) -> Pinhole {
        self.inner.inner_pinhole().clone()
    }

    fn backproject_settings(&self) -> BackprojectSettings {
        self.inner.settings()
    }
}

impl fmt::Display for BrownConrady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} camera model", self.model_name())?;
        super::write_common_params(f, self.intrinsics(), self.extrinsics())?;
        super::write_coeffs(f, "radial distortion", self.radial_dist_coeffs())?;
        super::write_coeffs(f, "tangential distortion", self.tangential_dist_coeffs())?;
        super::write_coeffs(
            f,
            "tangential distortion (poly)",
            self.tangential_dist_poly_coeffs(),
        )?;
        super::write_coeffs(
            f,
            "tangential distortion (ocv)",
            self.tangential_dist_ocv_coeffs(),
        )
    }
}
