pub mod camera;
pub mod config;
pub mod observer;
pub mod pan;
pub mod picking;

pub use camera::{Camera, CameraHost};
pub use config::{ConfigError, FallbackDepth, PanConfig, PanStrategy};
pub use observer::{NoopObserver, PanObserver, PanSample, TracingObserver};
pub use pan::{AnchorSource, PanGesture, PanStep, Panner, PointerInput, begin_pan, update_pan};
pub use picking::{Aabb, Plane, Ray};

// Re-export glam and the core crate for consistent version usage
pub use vantage_core;
pub use glam;
