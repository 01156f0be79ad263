//! Camera models: projection and back-projection for the pinhole camera and
//! four distortion laws layered on top of it.

use std::fmt;

use nalgebra::{Point2, Point3, Vector3};
use rayon::prelude::*;

use crate::error::Result;

mod brown_conrady;
mod gen_ftan_theta;
mod gen_ftheta;
mod intrinsics;
mod kannala;
mod pinhole;
mod solver;

pub use brown_conrady::{BrownConrady, BrownConradyConfig};
pub use gen_ftan_theta::{GenFTanTheta, GenFTanThetaConfig};
pub use gen_ftheta::{GenFTheta, GenFThetaConfig};
pub use intrinsics::{Extrinsics, Intrinsics};
pub use kannala::{Kannala, KannalaConfig};
pub use pinhole::Pinhole;
pub use solver::BackprojectSettings;

/// Common interface over every camera model.
///
/// `project` maps a world point to a pixel; `backproject` maps a pixel to
/// the world-frame viewing ray through it. Both are total over their domain
/// and report points outside it through [`crate::error::CameraError`].
pub trait Camera: fmt::Display + Send + Sync {
    /// Project a world point to pixel coordinates.
    fn project(&self, world: &Point3<f64>) -> Result<Point2<f64>>;

    /// Recover the world-frame viewing ray through a pixel. The returned
    /// direction is not normalized; its camera-frame depth component is one.
    fn backproject(&self, pixel: &Point2<f64>) -> Result<Vector3<f64>>;

    fn intrinsics(&self) -> &Intrinsics;

    fn extrinsics(&self) -> &Extrinsics;

    /// Human-readable model name.
    fn model_name(&self) -> &'static str;

    /// The ideal pinhole this model distorts: same intrinsics and pose,
    /// no distortion law.
    fn pinhole(&self) -> Pinhole;

    fn backproject_settings(&self) -> BackprojectSettings;

    fn focal_length(&self) -> (f64, f64) {
        self.intrinsics().focal_length()
    }

    fn principal_point(&self) -> (f64, f64) {
        self.intrinsics().principal_point()
    }

    fn skew(&self) -> f64 {
        self.intrinsics().skew()
    }

    fn image_size(&self) -> (u32, u32) {
        self.intrinsics().image_size()
    }

    /// Full parameter listing, one parameter per line.
    fn parameter_display(&self) -> String {
        self.to_string()
    }

    /// Project a batch of points in parallel. Results are index-aligned with
    /// the input; a failed point does not disturb its neighbours.
    fn project_points(&self, world: &[Point3<f64>]) -> Vec<Result<Point2<f64>>>
    where
        Self: Sized,
    {
        world.par_iter().map(|p| self.project(p)).collect()
    }

    /// Project a grid of points row by row, preserving the row structure.
    fn project_grid(&self, rows: &[Vec<Point3<f64>>]) -> Vec<Vec<Result<Point2<f64>>>>
    where
        Self: Sized,
    {
        rows.par_iter()
            .map(|row| row.iter().map(|p| self.project(p)).collect())
            .collect()
    }

    /// Back-project a batch of pixels in parallel, index-aligned with the
    /// input.
    fn backproject_points(&self, pixels: &[Point2<f64>]) -> Vec<Result<Vector3<f64>>>
    where
        Self: Sized,
    {
        pixels.par_iter().map(|p| self.backproject(p)).collect()
    }
}

/// Shared Display body: the intrinsic and extrinsic lines every model emits.
pub(crate) fn write_common_params(
    f: &mut fmt::Formatter<'_>,
    intrinsics: &Intrinsics,
    extrinsics: &Extrinsics,
) -> fmt::Result {
    let (fx, fy) = intrinsics.focal_length();
    let (cx, cy) = intrinsics.principal_point();
    let (width, height) = intrinsics.image_size();
    let r = extrinsics.rotation();
    let t = extrinsics.translation();
    writeln!(f, "  focal length: [{fx}, {fy}]")?;
    writeln!(f, "  principal point: [{cx}, {cy}]")?;
    writeln!(f, "  skew: {}", intrinsics.skew())?;
    writeln!(f, "  image size: [{width}, {height}]")?;
    writeln!(f, "  rotation: [{}, {}, {}]", r.x, r.y, r.z)?;
    writeln!(f, "  translation: [{}, {}, {}]", t.x, t.y, t.z)
}

/// One labelled coefficient line for Display.
pub(crate) fn write_coeffs(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    coeffs: &[f64],
) -> fmt::Result {
    writeln!(f, "  {label}: {coeffs:?}")
}
