//! Error types for camera setup validation.

use thiserror::Error;

/// Camera setup errors.
///
/// The transform functions never return these; they exist for callers that
/// want to reject a bad camera before feeding it to the math.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("projection matrix is not invertible")]
    SingularProjection,

    #[error("view matrix is not invertible")]
    SingularView,
}
