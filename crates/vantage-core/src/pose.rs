use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Quat, Vec3};

/// Camera placement in world space.
/// The view matrix is the inverse of this rigid transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl CameraPose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Camera at the origin looking down -z
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a pose with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Pose at `position` facing `target`
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let view = Mat4::look_at_rh(position, target, up);
        Self::from_view_matrix(view)
    }

    /// Recover the pose from a world-to-camera matrix.
    /// Any scale in the view matrix is dropped.
    pub fn from_view_matrix(view: Mat4) -> Self {
        let (_, rotation, position) = view.inverse().to_scale_rotation_translation();
        Self { position, rotation }
    }

    /// Camera-to-world matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// World-to-camera matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.to_matrix().inverse()
    }

    /// World-space viewing direction (-z of the camera frame)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn with_position(self, position: Vec3) -> Self {
        Self { position, ..self }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let p = CameraPose::identity();
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.rotation, Quat::IDENTITY);
        assert_eq!(p.view_matrix(), Mat4::IDENTITY);
        assert_eq!(p.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn test_from_position_view_matrix() {
        let p = CameraPose::from_position(Vec3::new(1.0, 2.0, 3.0));
        let expected = Mat4::from_translation(Vec3::new(-1.0, -2.0, -3.0));
        assert!(p.view_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_looking_at_matches_look_at_rh() {
        let eye = Vec3::new(3.0, 2.0, 6.0);
        let pose = CameraPose::looking_at(eye, Vec3::ZERO, Vec3::Y);
        let expected = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);

        assert!(pose.position.abs_diff_eq(eye, 1e-5));
        assert!(pose.view_matrix().abs_diff_eq(expected, 1e-5));
        assert!(pose.forward().abs_diff_eq(-eye.normalize(), 1e-5));
    }

    #[test]
    fn test_with_position_keeps_rotation() {
        let pose = CameraPose::new(Vec3::ZERO, Quat::from_rotation_y(0.5));
        let moved = pose.with_position(Vec3::X);
        assert_eq!(moved.rotation, pose.rotation);
        assert_eq!(moved.position, Vec3::X);
    }
}
