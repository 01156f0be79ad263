use std::fmt;

use nalgebra::{Point2, Point3, Vector3};

use super::solver::BackprojectSettings;
use super::{Camera, Extrinsics, GenFTheta, GenFThetaConfig, Intrinsics, Pinhole};
use crate::error::{ConfigError, Result};

/// Kannala models take the same parameters as the generic f-theta model.
pub type KannalaConfig = GenFThetaConfig;

/// Kannala-Brandt fisheye camera.
///
/// A restriction of [`GenFTheta`]: the same equidistant polynomial with
/// asymmetric and Fourier corrections, but the skew term is pinned to zero,
/// matching the published model.
#[derive(Debug, Clone, PartialEq)]
pub struct Kannala {
    inner: GenFTheta,
}

impl Kannala {
    pub fn new(intrinsics: Intrinsics, config: KannalaConfig) -> Result<Self> {
        if intrinsics.skew() != 0.0 {
            return Err(ConfigError::SkewNotSupported {
                model: "Kannala",
                skew: intrinsics.skew(),
            }
            .into());
        }
        Ok(Self {
            inner: GenFTheta::new(intrinsics, config)?,
        })
    }

    pub fn radial_dist_sym_coeffs(&self) -> &[f64] {
        self.inner.radial_dist_sym_coeffs()
    }

    pub fn radial_dist_asym_coeffs(&self) -> &[f64] {
        self.inner.radial_dist_asym_coeffs()
    }

    pub fn radial_dist_four_coeffs(&self) -> &[f64] {
        self.inner.radial_dist_four_coeffs()
    }

    pub fn tangential_dist_asym_coeffs(&self) -> &[f64] {
        self.inner.tangential_dist_asym_coeffs()
    }

    pub fn tangential_dist_four_coeffs(&self) -> &[f64] {
        self.inner.tangential_dist_four_coeffs()
    }
}

impl Camera for Kannala {
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
        "Kannala"
    }

    fn pinhole(&self) -> Pinhole {
        self.inner.inner_pinhole().clone()
    }

    fn backproject_settings(&self) -> BackprojectSettings {
        self.inner.settings()
    }
}

impl fmt::Display for Kannala {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} camera model", self.model_name())?;
        super::write_common_params(f, self.intrinsics(), self.extrinsics())?;
        super::write_coeffs(f, "radial distortion (sym)", self.radial_dist_sym_coeffs())?;
        super::write_coeffs(f, "radial distortion (asym)", self.radial_dist_asym_coeffs())?;
        super::write_coeffs(f, "radial distortion (fourier)", self.radial_dist_four_coeffs())?;
        super::write_coeffs(
            f,
            "tangential distortion (asym)",
            self.tangential_dist_asym_coeffs(),
        )?;
        super::write_coeffs(
            f,
            "tangential distortion (fourier)",
            self.tangential_dist_four_coeffs(),
        )
    }
}
