//! Per-frame pan diagnostics.
//!
//! Diagnostics stay out of the pan math; a caller that wants per-frame
//! records hands an observer to [`Panner::drive_observed`](crate::Panner::drive_observed).

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::pan::PanGesture;

/// One update of an active drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanSample {
    /// Updates since the gesture began, starting at 1
    pub frame: u32,
    pub cursor: Vec2,
    /// Camera position after the step
    pub camera_position: Vec3,
    /// Anchor re-projected through the new camera; matches `cursor` while pinned
    pub anchor_screen: Vec2,
}

impl PanSample {
    /// Pixel distance between the re-projected anchor and the cursor
    pub fn pin_error(&self) -> f32 {
        self.anchor_screen.distance(self.cursor)
    }
}

pub trait PanObserver {
    fn on_begin(&mut self, gesture: &PanGesture) {
        let _ = gesture;
    }

    fn on_step(&mut self, sample: &PanSample);

    fn on_end(&mut self) {}
}

/// Observer that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PanObserver for NoopObserver {
    fn on_step(&mut self, _sample: &PanSample) {}
}

/// Emits each sample as a `trace` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PanObserver for TracingObserver {
    fn on_begin(&mut self, gesture: &PanGesture) {
        tracing::trace!(
            anchor = %gesture.anchor_world,
            depth = gesture.anchor_depth,
            "pan began"
        );
    }

    fn on_step(&mut self, sample: &PanSample) {
        tracing::trace!(
            frame = sample.frame,
            cursor = %sample.cursor,
            camera = %sample.camera_position,
            pin_error = sample.pin_error(),
            "pan step"
        );
    }

    fn on_end(&mut self) {
        tracing::trace!("pan ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_error() {
        let sample = PanSample {
            frame: 1,
            cursor: Vec2::new(10.0, 10.0),
            camera_position: Vec3::ZERO,
            anchor_screen: Vec2::new(13.0, 14.0),
        };
        assert_eq!(sample.pin_error(), 5.0);
    }
}
