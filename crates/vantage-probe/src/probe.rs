//! Scenario runners behind the CLI subcommands

use std::io::Write;

use glam::Vec3;
use serde::Serialize;
use tracing::{debug, info};
use vantage_control::{Camera, CameraHost, PanGesture, PanSample, Panner, PointerInput};
use vantage_core::{
    CameraPoint, NdcPoint, ScreenPoint, ViewportPoint, WorldPoint, camera_depth, screen_to_world,
    world_to_screen,
};

use crate::recorder::ReplayLog;
use crate::scenario::Scenario;

/// One screen sample pushed through deproject then project.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoundTripSample {
    pub input: ScreenPoint,
    pub viewport: ViewportPoint,
    pub ndc: NdcPoint,
    pub camera: CameraPoint,
    pub world: WorldPoint,
    /// Re-projected screen position, z replaced by the camera depth
    pub reprojected: ScreenPoint,
    /// Pixel distance between input and reprojected x/y
    pub screen_error: f32,
    /// Absolute difference between requested and recovered depth
    pub depth_error: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundTripReport {
    pub samples: Vec<RoundTripSample>,
    pub max_screen_error: f32,
    pub max_depth_error: f32,
}

pub fn run_roundtrip(scenario: &Scenario) -> anyhow::Result<RoundTripReport> {
    let host = scenario.host();
    Camera::from_host(&host).validate()?;
    let projection = host.projection_matrix();
    let view = host.view_matrix();
    let viewport = host.viewport();

    let samples: Vec<RoundTripSample> = scenario
        .samples
        .iter()
        .map(|&input| {
            let forward = screen_to_world(input, projection, Some(view), viewport);
            let back = world_to_screen(forward.world, projection, view, viewport);

            let depth = camera_depth(view, forward.world.to_vec3());
            let reprojected = ScreenPoint(back.screen.xy().extend(depth));
            let screen_error = reprojected.xy().distance(input.xy());
            let depth_error = (depth - input.to_vec3().z).abs();

            debug!(
                screen = %input.to_vec3(),
                world = %forward.world.to_vec3(),
                screen_error,
                depth_error,
                "round trip"
            );

            RoundTripSample {
                input,
                viewport: forward.viewport,
                ndc: forward.ndc,
                camera: forward.camera,
                world: forward.world,
                reprojected,
                screen_error,
                depth_error,
            }
        })
        .collect();

    let max_screen_error = samples.iter().map(|s| s.screen_error).fold(0.0, f32::max);
    let max_depth_error = samples.iter().map(|s| s.depth_error).fold(0.0, f32::max);
    info!(
        samples = samples.len(),
        max_screen_error, max_depth_error, "round trip finished"
    );

    Ok(RoundTripReport {
        samples,
        max_screen_error,
        max_depth_error,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct PanReport {
    pub gesture: Option<PanGesture>,
    pub frames: Vec<PanSample>,
    pub start_position: Vec3,
    pub final_position: Vec3,
    pub max_pin_error: f32,
}

/// Replay the scenario's drag, optionally writing CSV rows to `csv`.
pub fn run_pan(scenario: &Scenario, csv: Option<Box<dyn Write>>) -> anyhow::Result<PanReport> {
    let mut host = scenario.host();
    let mut panner = Panner::new(scenario.pan);
    let mut log = ReplayLog::new(csv);

    let camera = Camera::from_host(&host);
    camera.validate()?;
    let start_position = camera.position();
    info!(
        strategy = ?scenario.pan.strategy,
        from = %scenario.drag.from,
        to = %scenario.drag.to,
        steps = scenario.drag.steps,
        "replaying drag"
    );

    panner.drive_observed(&mut host, PointerInput::Pressed(scenario.drag.from), &mut log);
    for cursor in scenario.drag.path() {
        panner.drive_observed(&mut host, PointerInput::Held(cursor), &mut log);
    }
    panner.drive_observed(&mut host, PointerInput::Released, &mut log);
    log.finish()?;

    let final_position = host.pose.position;
    let max_pin_error = log.max_pin_error();
    info!(
        frames = log.samples.len(),
        max_pin_error,
        moved = %(final_position - start_position),
        "drag finished"
    );

    Ok(PanReport {
        gesture: log.gesture,
        frames: log.samples,
        start_position,
        final_position,
        max_pin_error,
    })
}
