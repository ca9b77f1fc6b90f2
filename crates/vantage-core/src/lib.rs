pub mod coords;
pub mod error;
pub mod math;
pub mod pose;
pub mod space;

// Re-exports
pub use coords::{
    ScreenToWorld, WorldToScreen, camera_depth, camera_world_position, screen_to_camera,
    screen_to_ndc, screen_to_world, screen_to_world_point, world_to_screen,
    world_to_screen_point,
};
pub use error::CameraError;
pub use pose::CameraPose;
pub use space::{CameraPoint, NdcPoint, ScreenPoint, Viewport, ViewportPoint, WorldPoint};
