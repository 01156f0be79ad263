use nalgebra::{Point2, Point3, Rotation3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Pinhole intrinsic parameters: focal length, principal point, skew and the
/// image size the calibration is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    skew: f64,
    width: u32,
    height: u32,
}

impl Intrinsics {
    /// Validate and build intrinsics. Focal lengths must be finite and
    /// non-zero; the image must have non-zero area.
    pub fn new(
        fx: f64,
        fy: f64,
        cx: f64,
        cy: f64,
        skew: f64,
        width: u32,
        height: u32,
    ) -> Result<Self, ConfigError> {
        if fx == 0.0 || fy == 0.0 || !fx.is_finite() || !fy.is_finite() {
            return Err(ConfigError::InvalidFocalLength { fx, fy });
        }
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyImage { width, height });
        }
        Ok(Self {
            fx,
            fy,
            cx,
            cy,
            skew,
            width,
            height,
        })
    }

    pub fn focal_length(&self) -> (f64, f64) {
        (self.fx, self.fy)
    }

    pub fn principal_point(&self) -> (f64, f64) {
        (self.cx, self.cy)
    }

    pub fn skew(&self) -> f64 {
        self.skew
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Normalized camera-plane coordinates to pixel coordinates.
    pub(crate) fn to_pixel(&self, n: &Vector2<f64>) -> Point2<f64> {
        let u = self.fx * n.x + self.skew * n.y + self.cx;
        let v = self.fy * n.y + self.cy;
        Point2::new(u, v)
    }

    /// Pixel coordinates to normalized camera-plane coordinates. Exact
    /// inverse of `to_pixel`: the skew contribution is removed before the
    /// fx division.
    pub(crate) fn to_normalized(&self, pixel: &Point2<f64>) -> Vector2<f64> {
        let y = (pixel.y - self.cy) / self.fy;
        let x = (pixel.x - self.cx - self.skew * y) / self.fx;
        Vector2::new(x, y)
    }
}

/// Camera pose: an axis-angle rotation and a translation mapping world
/// coordinates into the camera frame. Immutable after construction; the
/// rotation matrix and its inverse are cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Extrinsics {
    rotation: Vector3<f64>,
    translation: Vector3<f64>,
    rot: Rotation3<f64>,
    rot_inv: Rotation3<f64>,
}

impl Extrinsics {
    pub fn new(rotation: Vector3<f64>, translation: Vector3<f64>) -> Self {
        let rot = Rotation3::from_scaled_axis(rotation);
        let rot_inv = rot.inverse();
        Self {
            rotation,
            translation,
            rot,
            rot_inv,
        }
    }

    /// Identity pose: the camera frame coincides with the world frame.
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    /// The axis-angle rotation vector.
    pub fn rotation(&self) -> Vector3<f64> {
        self.rotation
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    /// Map a world point into the camera frame: `R * p + t`.
    pub fn world_to_camera(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rot * point + self.translation
    }

    /// Map a camera-frame point back into the world frame.
    pub fn camera_to_world(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rot_inv * (point - self.translation)
    }

    /// Rotate a camera-frame direction into the world frame. Directions are
    /// unaffected by the translation.
    pub fn ray_to_world(&self, direction: &Vector3<f64>) -> Vector3<f64> {
        self.rot_inv * direction
    }

    /// Camera center in world coordinates (`-R^T * t`).
    pub fn camera_center(&self) -> Point3<f64> {
        Point3::from(-(self.rot_inv * self.translation))
    }
}

impl Default for Extrinsics {
    fn default() -> Self {
        Self::identity()
    }
}
