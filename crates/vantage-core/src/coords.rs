//! Screen <-> world coordinate transforms.
//!
//! The pipeline, in either direction:
//!
//! ```text
//! screen (pixels) <-> viewport (0..1) <-> ndc (-1..1) <-> camera (-z forward) <-> world
//! ```
//!
//! Projection matrices use the OpenGL clip convention (`Mat4::perspective_rh_gl`).
//! Both the projection and view matrix must be invertible. Nothing here checks
//! that: a singular matrix propagates NaN/Inf into the output. Use
//! `CameraError` validation upstream if the inputs are untrusted.

use crate::math::{Mat4, Vec3, Vec4};
use crate::space::{CameraPoint, NdcPoint, ScreenPoint, Viewport, ViewportPoint, WorldPoint};

/// Result of [`screen_to_world`] with every intermediate stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenToWorld {
    /// `Vec3::ZERO` when no view matrix was supplied
    pub world: WorldPoint,
    pub viewport: ViewportPoint,
    pub ndc: NdcPoint,
    pub camera: CameraPoint,
}

/// Result of [`world_to_screen`] with every intermediate stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldToScreen {
    pub screen: ScreenPoint,
    pub viewport: ViewportPoint,
    pub ndc: NdcPoint,
    pub camera: CameraPoint,
}

/// Deproject a screen point.
///
/// `screen.z` is the camera-space distance of the result along -z, not a
/// depth buffer value. The NDC depth is found by pushing that distance
/// through the projection, so non-linear depth is handled.
///
/// Pass `view: None` to stop at camera space; `world` is then zero.
pub fn screen_to_world(
    screen: ScreenPoint,
    projection: Mat4,
    view: Option<Mat4>,
    viewport: Viewport,
) -> ScreenToWorld {
    let s = screen.to_vec3();

    let viewport_point = ViewportPoint::new(s.x / viewport.width(), s.y / viewport.height(), 0.0);

    // camera looks down -z
    let z_clip = projection * Vec4::new(0.0, 0.0, -s.z, 1.0);
    let z_ndc = z_clip.z / z_clip.w;

    let v = viewport_point.to_vec3();
    let ndc = NdcPoint::new(v.x * 2.0 - 1.0, v.y * 2.0 - 1.0, z_ndc);

    let deprojected = projection.inverse() * ndc.to_vec3().extend(1.0);
    let camera = CameraPoint(deprojected.truncate() / deprojected.w);

    let world = match view {
        Some(view) => WorldPoint(view.inverse().transform_point3(camera.to_vec3())),
        None => WorldPoint::ZERO,
    };

    ScreenToWorld {
        world,
        viewport: viewport_point,
        ndc,
        camera,
    }
}

/// Project a world point onto the screen.
///
/// A point with `clip.w == 0` (on the camera's focal plane) has no screen
/// position; screen, viewport and ndc all come back zero. The returned
/// `screen.z` is the input `world.z`, not a depth.
pub fn world_to_screen(
    world: WorldPoint,
    projection: Mat4,
    view: Mat4,
    viewport: Viewport,
) -> WorldToScreen {
    let camera = CameraPoint(view.transform_point3(world.to_vec3()));

    // w = 1 so the translation part of the projection applies
    let clip = projection * camera.to_vec3().extend(1.0);

    if clip.w == 0.0 {
        return WorldToScreen {
            screen: ScreenPoint::ZERO,
            viewport: ViewportPoint::ZERO,
            ndc: NdcPoint::ZERO,
            camera,
        };
    }

    let ndc = NdcPoint(clip.truncate() / clip.w);
    let n = ndc.to_vec3();
    let viewport_point = ViewportPoint::new((n.x + 1.0) * 0.5, (n.y + 1.0) * 0.5, 0.0);
    let v = viewport_point.to_vec3();

    let screen = ScreenPoint::new(
        v.x * viewport.width(),
        v.y * viewport.height(),
        world.to_vec3().z,
    );

    WorldToScreen {
        screen,
        viewport: viewport_point,
        ndc,
        camera,
    }
}

/// Deproject to NDC only.
pub fn screen_to_ndc(screen: ScreenPoint, projection: Mat4, viewport: Viewport) -> NdcPoint {
    screen_to_world(screen, projection, None, viewport).ndc
}

/// Deproject to camera space only. No view matrix needed.
pub fn screen_to_camera(screen: ScreenPoint, projection: Mat4, viewport: Viewport) -> CameraPoint {
    screen_to_world(screen, projection, None, viewport).camera
}

pub fn screen_to_world_point(
    screen: ScreenPoint,
    projection: Mat4,
    view: Mat4,
    viewport: Viewport,
) -> WorldPoint {
    screen_to_world(screen, projection, Some(view), viewport).world
}

pub fn world_to_screen_point(
    world: WorldPoint,
    projection: Mat4,
    view: Mat4,
    viewport: Viewport,
) -> ScreenPoint {
    world_to_screen(world, projection, view, viewport).screen
}

/// World position of a camera given its world-to-camera matrix.
pub fn camera_world_position(view: Mat4) -> Vec3 {
    view.inverse().transform_point3(Vec3::ZERO)
}

/// Distance of `world` in front of the camera, in the convention
/// [`ScreenPoint`] z uses (positive = in front).
pub fn camera_depth(view: Mat4, world: Vec3) -> f32 {
    -view.transform_point3(world).z
}
