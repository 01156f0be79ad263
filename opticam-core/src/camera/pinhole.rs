use std::fmt;

use nalgebra::{Point2, Point3, Vector2, Vector3};

use super::solver::BackprojectSettings;
use super::{Camera, Extrinsics, Intrinsics};
use crate::error::{DomainError, Result};

/// Ideal distortion-free camera.
///
/// Every distortion model composes one of these and routes its intrinsic and
/// extrinsic math through it; the distortion laws only ever touch normalized
/// camera-plane coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Pinhole {
    intrinsics: Intrinsics,
    extrinsics: Extrinsics,
}

impl Pinhole {
    pub fn new(intrinsics: Intrinsics, extrinsics: Extrinsics) -> Self {
        Self {
            intrinsics,
            extrinsics,
        }
    }

    /// World point to normalized camera-plane coordinates.
    ///
    /// Fails when the camera-frame depth is non-positive: a point on or
    /// behind the camera plane has no projection.
    pub(crate) fn world_to_normalized(
        &self,
        world: &Point3<f64>,
    ) -> std::result::Result<Vector2<f64>, DomainError> {
        let cam = self.extrinsics.world_to_camera(world);
        if cam.z <= 0.0 {
            return Err(DomainError::BehindCamera { z: cam.z });
        }
        Ok(Vector2::new(cam.x / cam.z, cam.y / cam.z))
    }

    pub(crate) fn normalized_to_pixel(&self, n: &Vector2<f64>) -> Point2<f64> {
        self.intrinsics.to_pixel(n)
    }

    pub(crate) fn pixel_to_normalized(&self, pixel: &Point2<f64>) -> Vector2<f64> {
        self.intrinsics.to_normalized(pixel)
    }

    /// Camera-frame direction `(x, y, 1)` rotated into the world frame.
    pub(crate) fn ray_to_world(&self, n: &Vector2<f64>) -> Vector3<f64> {
        self.extrinsics.ray_to_world(&Vector3::new(n.x, n.y, 1.0))
    }
}

impl Camera for Pinhole {
    fn project(&self, world: &Point3<f64>) -> Result<Point2<f64>> {
        let n = self.world_to_normalized(world)?;
        Ok(self.normalized_to_pixel(&n))
    }

    fn backproject(&self, pixel: &Point2<f64>) -> Result<Vector3<f64>> {
        // The forward map is affine, so the inverse is closed-form.
        let n = self.pixel_to_normalized(pixel);
        Ok(self.ray_to_world(&n))
    }

    fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    fn extrinsics(&self) -> &Extrinsics {
        &self.extrinsics
    }

    fn model_name(&self) -> &'static str {
        "Pinhole"
    }

    fn pinhole(&self) -> Pinhole {
        self.clone()
    }

    fn backproject_settings(&self) -> BackprojectSettings {
        // Never consulted: the pinhole inverse is closed-form.
        BackprojectSettings::default()
    }
}

impl fmt::Display for Pinhole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} camera model", self.model_name())?;
        super::write_common_params(f, &self.intrinsics, &self.extrinsics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CameraError;

    fn simple_pinhole() -> Pinhole {
        let intr = Intrinsics::new(100.0, 100.0, 50.0, 50.0, 0.0, 100, 100).unwrap();
        Pinhole::new(intr, Extrinsics::identity())
    }

    #[test]
    fn test_on_axis_point_maps_to_principal_point() {
        let camera = simple_pinhole();
        let pixel = camera.project(&Point3::new(0.0, 0.0, 10.0)).unwrap();
        assert!((pixel.x - 50.0).abs() < 1e-9);
        assert!((pixel.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_point_projection() {
        let camera = simple_pinhole();
        let pixel = camera.project(&Point3::new(1.0, 0.0, 10.0)).unwrap();
        assert!((pixel.x - 60.0).abs() < 1e-9);
        assert!((pixel.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_behind_camera_fails() {
        let camera = simple_pinhole();
        let result = camera.project(&Point3::new(0.0, 0.0, -1.0));
        assert!(matches!(
            result,
            Err(CameraError::Domain(DomainError::BehindCamera { .. }))
        ));
    }

    #[test]
    fn test_point_on_camera_plane_fails() {
        let camera = simple_pinhole();
        let result = camera.project(&Point3::new(0.3, 0.1, 0.0));
        assert!(matches!(
            result,
            Err(CameraError::Domain(DomainError::BehindCamera { .. }))
        ));
    }

    #[test]
    fn test_backproject_principal_point() {
        let camera = simple_pinhole();
        let ray = camera.backproject(&Point2::new(50.0, 50.0)).unwrap();
        let unit = ray.normalize();
        assert!((unit - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let camera = simple_pinhole();
        let point = Point3::new(0.5, -0.3, 2.0);
        let pixel = camera.project(&point).unwrap();
        let ray = camera.backproject(&pixel).unwrap();
        let cos = ray.normalize().dot(&point.coords.normalize());
        assert!((cos - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_skew_round_trip() {
        let intr = Intrinsics::new(120.0, 110.0, 64.0, 48.0, 2.5, 128, 96).unwrap();
        let camera = Pinhole::new(intr, Extrinsics::identity());
        let point = Point3::new(0.2, 0.35, 1.5);
        let pixel = camera.project(&point).unwrap();
        let ray = camera.backproject(&pixel).unwrap();
        let cos = ray.normalize().dot(&point.coords.normalize());
        assert!((cos - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_translated_camera() {
        let intr = Intrinsics::new(100.0, 100.0, 50.0, 50.0, 0.0, 100, 100).unwrap();
        let ext = Extrinsics::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 5.0));
        let camera = Pinhole::new(intr, ext);
        // World origin sits 5 units in front of the camera
        let pixel = camera.project(&Point3::new(0.0, 0.0, 0.0)).unwrap();
        assert!((pixel.x - 50.0).abs() < 1e-9);
        assert!((pixel.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_names_model() {
        let camera = simple_pinhole();
        let text = camera.parameter_display();
        assert!(text.starts_with("Pinhole camera model"));
        assert!(text.contains("focal length"));
    }
}
