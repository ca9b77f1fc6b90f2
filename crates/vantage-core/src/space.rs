//! Coordinate space value types.
//!
//! Every stage of the screen <-> world pipeline gets its own point type so a
//! camera-space point can't be handed to something expecting pixels. They are
//! thin `Copy` wrappers over [`Vec3`].

use serde::{Deserialize, Serialize};

use crate::error::CameraError;
use crate::math::{Vec2, Vec3};

macro_rules! point_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Vec3);

        impl $name {
            pub const ZERO: Self = Self(Vec3::ZERO);

            pub fn new(x: f32, y: f32, z: f32) -> Self {
                Self(Vec3::new(x, y, z))
            }

            /// x/y components
            pub fn xy(&self) -> Vec2 {
                self.0.truncate()
            }

            pub fn to_vec3(self) -> Vec3 {
                self.0
            }
        }

        impl From<Vec3> for $name {
            fn from(v: Vec3) -> Self {
                Self(v)
            }
        }

        impl From<$name> for Vec3 {
            fn from(p: $name) -> Self {
                p.0
            }
        }
    };
}

point_type!(
    /// Pixel position relative to the bottom-left corner of the viewport.
    ///
    /// `z` is not a depth buffer value. When deprojecting it selects the
    /// camera-space distance (along -z) of the resulting point; when
    /// projecting it carries the source world z through for display.
    ScreenPoint
);

point_type!(
    /// Screen position divided by the viewport size, (0, 0) to (1, 1) on screen.
    ViewportPoint
);

point_type!(
    /// Normalized device coordinates, -1 to 1 on every axis inside the view volume.
    NdcPoint
);

point_type!(
    /// Point in the camera's right-handed local frame, looking down -z.
    CameraPoint
);

point_type!(
    /// Point in the global frame.
    WorldPoint
);

/// Pixel dimensions of the render target.
///
/// Zero, negative and non-finite sizes are rejected up front so the
/// viewport division in the transforms is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawViewport", into = "RawViewport")]
pub struct Viewport {
    width: f32,
    height: f32,
}

#[derive(Serialize, Deserialize)]
struct RawViewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, CameraError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(CameraError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Create from integer pixel dimensions
    pub fn from_pixels(width: u32, height: u32) -> Result<Self, CameraError> {
        Self::new(width as f32, height as f32)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// width / height
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Pixel position of the viewport center
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

impl Default for Viewport {
    /// 1920x1080
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl TryFrom<RawViewport> for Viewport {
    type Error = CameraError;

    fn try_from(raw: RawViewport) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl From<Viewport> for RawViewport {
    fn from(v: Viewport) -> Self {
        Self {
            width: v.width,
            height: v.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_valid() {
        let viewport = Viewport::new(1920.0, 1080.0).unwrap();
        assert_eq!(viewport.size(), Vec2::new(1920.0, 1080.0));
        assert_eq!(viewport.center(), Vec2::new(960.0, 540.0));
        assert!((viewport.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_viewport_default_is_valid() {
        let viewport = Viewport::default();
        assert_eq!(Viewport::new(viewport.width(), viewport.height()), Ok(viewport));
    }

    #[test]
    fn test_viewport_rejects_zero() {
        let err = Viewport::new(0.0, 1080.0).unwrap_err();
        assert_eq!(
            err,
            CameraError::InvalidViewport {
                width: 0.0,
                height: 1080.0
            }
        );
        assert!(Viewport::from_pixels(640, 0).is_err());
    }

    #[test]
    fn test_viewport_rejects_non_finite() {
        assert!(Viewport::new(f32::NAN, 10.0).is_err());
        assert!(Viewport::new(10.0, f32::INFINITY).is_err());
        assert!(Viewport::new(-5.0, 10.0).is_err());
    }

    #[test]
    fn test_viewport_deserialize_validates() {
        let ok: Viewport = serde_json::from_str(r#"{"width": 800, "height": 600}"#).unwrap();
        assert_eq!(ok.width(), 800.0);

        let bad = serde_json::from_str::<Viewport>(r#"{"width": 0, "height": 600}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_point_serde_is_transparent() {
        let p = ScreenPoint::new(1.0, 2.0, 3.0);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0]");
        let back: ScreenPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_point_xy() {
        let p = NdcPoint::new(0.25, -0.5, 0.9);
        assert_eq!(p.xy(), Vec2::new(0.25, -0.5));
        assert_eq!(Vec3::from(p), Vec3::new(0.25, -0.5, 0.9));
    }
}
