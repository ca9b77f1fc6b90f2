//! Anchored camera panning
//!
//! A drag picks a world-space anchor under the cursor when it starts. Every
//! update after that moves the camera (translation only) so the anchor stays
//! under the cursor at the depth it was picked at.

use glam::{Mat3, Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use vantage_core::{ScreenPoint, camera_depth, camera_world_position, screen_to_camera};

use crate::camera::{Camera, CameraHost};
use crate::config::{FallbackDepth, PanConfig, PanStrategy};
use crate::observer::{NoopObserver, PanObserver, PanSample};
use crate::picking::{Plane, Ray};

/// Where the anchor of a gesture came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSource {
    /// Scene raycast hit
    Hit,
    /// Cursor deprojected at the fallback depth
    Fallback,
}

/// State captured when a drag starts, consumed by every update of that drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanGesture {
    /// World point pinned under the cursor
    pub anchor_world: Vec3,
    /// Distance of the anchor in front of the camera at gesture start
    pub anchor_depth: f32,
    pub source: AnchorSource,
}

/// Camera placement produced by one pan update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanStep {
    pub camera_position: Vec3,
    /// View matrix with the current rotation and the new translation
    pub view_matrix: Mat4,
}

impl PanStep {
    fn unchanged(camera: &Camera) -> Self {
        Self {
            camera_position: camera.position(),
            view_matrix: camera.view,
        }
    }
}

/// Pick the anchor for a new drag.
///
/// `raycast` gets the world ray through the cursor. On a miss the cursor is
/// deprojected at the fallback depth instead.
pub fn begin_pan<F>(cursor: Vec2, camera: &Camera, fallback: FallbackDepth, raycast: F) -> PanGesture
where
    F: FnOnce(&Ray) -> Option<Vec3>,
{
    let ray = camera.screen_to_ray(cursor);

    let gesture = match raycast(&ray) {
        Some(hit) => PanGesture {
            anchor_world: hit,
            anchor_depth: camera_depth(camera.view, hit),
            source: AnchorSource::Hit,
        },
        None => {
            let depth = fallback.resolve(camera.near, camera.far);
            PanGesture {
                anchor_world: camera.screen_to_world(cursor, depth),
                anchor_depth: depth,
                source: AnchorSource::Fallback,
            }
        }
    };

    debug!(
        anchor = %gesture.anchor_world,
        depth = gesture.anchor_depth,
        source = ?gesture.source,
        "pan anchor picked"
    );

    gesture
}

/// Solve the camera placement that keeps the anchor under `cursor`.
pub fn update_pan(
    gesture: &PanGesture,
    cursor: Vec2,
    camera: &Camera,
    strategy: PanStrategy,
) -> PanStep {
    let step = match strategy {
        PanStrategy::PlaneIntersection => solve_plane_intersection(gesture, cursor, camera),
        PanStrategy::ViewMatrixColumn => solve_view_matrix_column(gesture, cursor, camera),
    };
    trace!(cursor = %cursor, camera = %step.camera_position, ?strategy, "pan update");
    step
}

/// Anchor plane faces the camera; the camera moves by whatever the cursor ray
/// misses the anchor by within that plane.
fn solve_plane_intersection(gesture: &PanGesture, cursor: Vec2, camera: &Camera) -> PanStep {
    let plane = Plane::new(gesture.anchor_world, camera.forward());
    let ray = camera.screen_to_ray(cursor);

    let Some(hit) = plane.intersect_point(&ray) else {
        warn!(
            anchor = %gesture.anchor_world,
            cursor = %cursor,
            "cursor ray misses the anchor plane, camera left in place"
        );
        return PanStep::unchanged(camera);
    };

    let offset = gesture.anchor_world - hit;
    PanStep {
        camera_position: camera.position() + offset,
        view_matrix: camera.view * Mat4::from_translation(-offset),
    }
}

/// Solve `view' * anchor = cursor_camera` for the translation column of
/// `view'`, keeping the rotation/scale block of the current view.
fn solve_view_matrix_column(gesture: &PanGesture, cursor: Vec2, camera: &Camera) -> PanStep {
    let screen = ScreenPoint(cursor.extend(gesture.anchor_depth));
    let cursor_camera = screen_to_camera(screen, camera.projection, camera.viewport).to_vec3();

    let rotation = Mat3::from_mat4(camera.view);
    let translation = cursor_camera - rotation * gesture.anchor_world;

    let mut view_matrix = camera.view;
    view_matrix.w_axis = translation.extend(1.0);

    PanStep {
        camera_position: camera_world_position(view_matrix),
        view_matrix,
    }
}

/// Pointer state for one frame, as the host's input loop sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Button went down this frame
    Pressed(Vec2),
    /// Button still down
    Held(Vec2),
    /// Button went up this frame
    Released,
    /// No button activity
    Idle,
}

#[derive(Debug, Clone, Copy, Default)]
enum PanState {
    #[default]
    Idle,
    Dragging { gesture: PanGesture, frame: u32 },
}

/// Idle/Dragging state machine owning the active gesture.
///
/// Only one drag exists at a time; beginning again while dragging replaces
/// the gesture.
#[derive(Debug, Clone, Default)]
pub struct Panner {
    config: PanConfig,
    state: PanState,
}

impl Panner {
    pub fn new(config: PanConfig) -> Self {
        Self {
            config,
            state: PanState::Idle,
        }
    }

    pub fn config(&self) -> PanConfig {
        self.config
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PanState::Dragging { .. })
    }

    /// The active gesture, if dragging
    pub fn gesture(&self) -> Option<&PanGesture> {
        match &self.state {
            PanState::Dragging { gesture, .. } => Some(gesture),
            PanState::Idle => None,
        }
    }

    /// Idle -> Dragging
    pub fn begin<F>(&mut self, cursor: Vec2, camera: &Camera, raycast: F) -> PanGesture
    where
        F: FnOnce(&Ray) -> Option<Vec3>,
    {
        if self.is_dragging() {
            debug!("pan restarted while dragging");
        }
        let gesture = begin_pan(cursor, camera, self.config.fallback_depth, raycast);
        self.state = PanState::Dragging { gesture, frame: 0 };
        gesture
    }

    /// Dragging -> Dragging. None while idle.
    pub fn update(&mut self, cursor: Vec2, camera: &Camera) -> Option<PanStep> {
        let PanState::Dragging { gesture, frame } = &mut self.state else {
            return None;
        };
        *frame += 1;
        Some(update_pan(gesture, cursor, camera, self.config.strategy))
    }

    /// Dragging -> Idle, handing back the discarded gesture
    pub fn end(&mut self) -> Option<PanGesture> {
        match std::mem::take(&mut self.state) {
            PanState::Dragging { gesture, frame } => {
                debug!(frames = frame, "pan ended");
                Some(gesture)
            }
            PanState::Idle => None,
        }
    }

    /// Run one frame against a host.
    pub fn drive<H>(&mut self, host: &mut H, input: PointerInput) -> Option<PanStep>
    where
        H: CameraHost + ?Sized,
    {
        self.drive_observed(host, input, &mut NoopObserver)
    }

    /// [`drive`](Self::drive), reporting to `observer`.
    ///
    /// The press frame both starts the gesture and applies the first update.
    pub fn drive_observed<H, O>(
        &mut self,
        host: &mut H,
        input: PointerInput,
        observer: &mut O,
    ) -> Option<PanStep>
    where
        H: CameraHost + ?Sized,
        O: PanObserver + ?Sized,
    {
        match input {
            PointerInput::Pressed(cursor) => {
                let camera = Camera::from_host(&*host);
                let gesture = self.begin(cursor, &camera, |ray| host.raycast(ray));
                observer.on_begin(&gesture);
                self.step(host, cursor, observer)
            }
            PointerInput::Held(cursor) => self.step(host, cursor, observer),
            PointerInput::Released => {
                if self.end().is_some() {
                    observer.on_end();
                }
                None
            }
            PointerInput::Idle => None,
        }
    }

    fn step<H, O>(&mut self, host: &mut H, cursor: Vec2, observer: &mut O) -> Option<PanStep>
    where
        H: CameraHost + ?Sized,
        O: PanObserver + ?Sized,
    {
        let camera = Camera::from_host(&*host);
        let step = self.update(cursor, &camera)?;
        host.apply_camera_position(step.camera_position);

        if let PanState::Dragging { gesture, frame } = &self.state {
            let anchor_screen = camera
                .with_view(step.view_matrix)
                .world_to_screen(gesture.anchor_world);
            observer.on_step(&PanSample {
                frame: *frame,
                cursor,
                camera_position: step.camera_position,
                anchor_screen,
            });
        }

        Some(step)
    }
}
