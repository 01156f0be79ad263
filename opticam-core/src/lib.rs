//! Camera projection and back-projection.
//!
//! Five camera models share one [`Camera`] interface: the ideal
//! [`Pinhole`], the classic [`BrownConrady`] and [`Kannala`] calibrations,
//! and the generic [`GenFTheta`] and [`GenFTanTheta`] laws they specialize.
//! Projection maps world points through the camera pose, the model's
//! distortion law and the pinhole intrinsics to pixels; back-projection
//! recovers the world-frame viewing ray through a pixel, iteratively where
//! the distortion law has no closed-form inverse.

pub mod camera;
pub mod error;
pub mod math;

pub use camera::{
    BackprojectSettings, BrownConrady, BrownConradyConfig, Camera, Extrinsics, GenFTanTheta,
    GenFTanThetaConfig, GenFTheta, GenFThetaConfig, Intrinsics, Kannala, KannalaConfig, Pinhole,
};
pub use error::{CameraError, ConfigError, ConvergenceError, DomainError, Result};
