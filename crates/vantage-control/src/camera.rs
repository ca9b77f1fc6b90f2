use glam::{Mat4, Vec2, Vec3};
use vantage_core::{
    CameraError, CameraPose, ScreenPoint, Viewport, WorldPoint, camera_world_position,
    screen_to_world_point, world_to_screen_point,
};

use crate::picking::Ray;

/// What the host engine supplies each frame.
///
/// Panning only needs plain matrices, the viewport size and a ray query;
/// everything engine specific stays behind this trait.
pub trait CameraHost {
    fn projection_matrix(&self) -> Mat4;

    /// World-to-camera matrix
    fn view_matrix(&self) -> Mat4;

    fn viewport(&self) -> Viewport;

    /// (near, far) clip distances
    fn clip_planes(&self) -> (f32, f32);

    /// Closest scene hit along `ray`, if any
    fn raycast(&self, ray: &Ray) -> Option<Vec3>;

    /// Move the camera to a new world position, keeping its orientation
    fn apply_camera_position(&mut self, position: Vec3);
}

/// Snapshot of a camera's intrinsics and extrinsics for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub projection: Mat4,
    /// World-to-camera matrix
    pub view: Mat4,
    pub viewport: Viewport,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(projection: Mat4, view: Mat4, viewport: Viewport, near: f32, far: f32) -> Self {
        Self {
            projection,
            view,
            viewport,
            near,
            far,
        }
    }

    /// GL-style perspective camera placed at `pose`.
    /// Aspect ratio comes from the viewport.
    pub fn perspective(
        pose: &CameraPose,
        fov_y: f32,
        viewport: Viewport,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            projection: Mat4::perspective_rh_gl(fov_y, viewport.aspect(), near, far),
            view: pose.view_matrix(),
            viewport,
            near,
            far,
        }
    }

    /// Snapshot the host's current camera
    pub fn from_host<H: CameraHost + ?Sized>(host: &H) -> Self {
        let (near, far) = host.clip_planes();
        Self {
            projection: host.projection_matrix(),
            view: host.view_matrix(),
            viewport: host.viewport(),
            near,
            far,
        }
    }

    pub fn with_view(self, view: Mat4) -> Self {
        Self { view, ..self }
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        camera_world_position(self.view)
    }

    /// World-space viewing direction
    pub fn forward(&self) -> Vec3 {
        self.view
            .inverse()
            .transform_vector3(Vec3::NEG_Z)
            .normalize()
    }

    /// Deproject a pixel position at `depth` in front of the camera
    pub fn screen_to_world(&self, cursor: Vec2, depth: f32) -> Vec3 {
        let screen = ScreenPoint(cursor.extend(depth));
        screen_to_world_point(screen, self.projection, self.view, self.viewport).to_vec3()
    }

    /// Pixel position of a world point
    pub fn world_to_screen(&self, world: Vec3) -> Vec2 {
        world_to_screen_point(WorldPoint(world), self.projection, self.view, self.viewport).xy()
    }

    /// World-space ray through a pixel, starting on the near plane
    pub fn screen_to_ray(&self, cursor: Vec2) -> Ray {
        let near = self.screen_to_world(cursor, self.near);
        let far = self.screen_to_world(cursor, self.far);
        Ray::new(near, far - near)
    }

    /// Check the invertibility preconditions of the transforms.
    pub fn validate(&self) -> Result<(), CameraError> {
        let invertible = |m: Mat4| {
            let det = m.determinant();
            det != 0.0 && det.is_finite()
        };
        if !invertible(self.projection) {
            return Err(CameraError::SingularProjection);
        }
        if !invertible(self.view) {
            return Err(CameraError::SingularView);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0).unwrap()
    }

    fn camera_at(pose: CameraPose) -> Camera {
        Camera::perspective(&pose, 60.0_f32.to_radians(), viewport(), 0.1, 100.0)
    }

    #[test]
    fn test_position_and_forward() {
        let pose = CameraPose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.5));
        let camera = camera_at(pose);

        assert!(camera.position().abs_diff_eq(pose.position, 1e-5));
        assert!(camera.forward().abs_diff_eq(pose.forward(), 1e-5));
    }

    #[test]
    fn test_center_ray_follows_forward() {
        let camera = camera_at(CameraPose::from_position(Vec3::new(0.0, 0.0, 5.0)));
        let ray = camera.screen_to_ray(Vec2::new(400.0, 300.0));

        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-4));
        assert!(ray.origin.abs_diff_eq(Vec3::new(0.0, 0.0, 4.9), 1e-3));
    }

    #[test]
    fn test_screen_world_round_trip() {
        let camera = camera_at(CameraPose::looking_at(
            Vec3::new(3.0, 4.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
        ));
        let cursor = Vec2::new(250.0, 410.0);
        let world = camera.screen_to_world(cursor, 7.5);

        assert!(camera.world_to_screen(world).abs_diff_eq(cursor, 1e-2));
    }

    #[test]
    fn test_ray_passes_through_deprojected_point() {
        let camera = camera_at(CameraPose::looking_at(
            Vec3::new(-2.0, 1.0, 6.0),
            Vec3::ZERO,
            Vec3::Y,
        ));
        let cursor = Vec2::new(600.0, 120.0);
        let ray = camera.screen_to_ray(cursor);
        let point = camera.screen_to_world(cursor, 10.0);

        let to_point = (point - ray.origin).normalize();
        assert!(to_point.abs_diff_eq(ray.direction, 1e-3));
    }

    #[test]
    fn test_validate() {
        let camera = camera_at(CameraPose::identity());
        assert!(camera.validate().is_ok());

        let flat = Camera {
            projection: Mat4::ZERO,
            ..camera
        };
        assert_eq!(flat.validate(), Err(CameraError::SingularProjection));

        let collapsed = camera.with_view(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));
        assert_eq!(collapsed.validate(), Err(CameraError::SingularView));
    }
}
