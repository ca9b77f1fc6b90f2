//! Scripted probe scenarios
//!
//! A scenario is a JSON file describing a camera, a box scene, a drag path and
//! a set of screen samples. [`SceneHost`] plays the role of the engine.

use std::path::Path;

use anyhow::{Context, Result};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use vantage_control::{Aabb, CameraHost, PanConfig, Ray};
use vantage_core::{CameraPose, ScreenPoint, Viewport};

/// Camera placement and lens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSpec {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y_degrees: 60.0,
            near: 0.3,
            far: 1000.0,
        }
    }
}

/// Straight-line drag from `from` to `to` over `steps` held frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSpec {
    pub from: Vec2,
    pub to: Vec2,
    pub steps: u32,
}

impl DragSpec {
    /// Cursor positions for the held frames, ending on `to`
    pub fn path(&self) -> Vec<Vec2> {
        let steps = self.steps.max(1);
        (1..=steps)
            .map(|i| self.from.lerp(self.to, i as f32 / steps as f32))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub camera: CameraSpec,
    pub viewport: Viewport,
    pub scene: Vec<Aabb>,
    pub drag: DragSpec,
    /// Screen points (z = camera depth) for the round-trip check
    pub samples: Vec<ScreenPoint>,
    pub pan: PanConfig,
}

impl Default for Scenario {
    /// 60 degree camera at the origin over a 1080p viewport, one box ten units ahead.
    fn default() -> Self {
        Self {
            camera: CameraSpec::default(),
            viewport: Viewport::default(),
            scene: vec![Aabb::unit_cube(Vec3::new(0.0, 0.0, -10.5), Vec3::ONE)],
            drag: DragSpec {
                from: Vec2::new(960.0, 540.0),
                to: Vec2::new(1260.0, 640.0),
                steps: 30,
            },
            samples: vec![
                ScreenPoint::new(960.0, 540.0, 10.0),
                ScreenPoint::new(0.0, 0.0, 5.0),
                ScreenPoint::new(1920.0, 1080.0, 250.0),
                ScreenPoint::new(400.0, 900.0, 1.0),
            ],
            pan: PanConfig::default(),
        }
    }
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid scenario")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn host(&self) -> SceneHost {
        SceneHost {
            pose: CameraPose::looking_at(self.camera.position, self.camera.look_at, self.camera.up),
            fov_y: self.camera.fov_y_degrees.to_radians(),
            near: self.camera.near,
            far: self.camera.far,
            viewport: self.viewport,
            scene: self.scene.clone(),
        }
    }
}

/// Engine stand-in: a posed GL perspective camera over a list of boxes.
#[derive(Debug, Clone)]
pub struct SceneHost {
    pub pose: CameraPose,
    fov_y: f32,
    near: f32,
    far: f32,
    viewport: Viewport,
    scene: Vec<Aabb>,
}

impl CameraHost for SceneHost {
    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.viewport.aspect(), self.near, self.far)
    }

    fn view_matrix(&self) -> Mat4 {
        self.pose.view_matrix()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    fn raycast(&self, ray: &Ray) -> Option<Vec3> {
        self.scene
            .iter()
            .filter_map(|aabb| ray.intersect_aabb(aabb))
            .min_by(|a, b| a.total_cmp(b))
            .map(|t| ray.at(t))
    }

    fn apply_camera_position(&mut self, position: Vec3) {
        self.pose = self.pose.with_position(position);
    }
}
