//! Pan configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the camera translation is solved each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanStrategy {
    /// Intersect the cursor ray with a camera-facing plane through the anchor
    /// and shift the camera by the miss distance. No view matrix inversion in
    /// the solve.
    #[default]
    PlaneIntersection,
    /// Solve for the view matrix translation column directly.
    ViewMatrixColumn,
}

/// Anchor depth used when the gesture-start raycast misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackDepth {
    #[default]
    FarPlane,
    /// Halfway between the near and far planes
    Midpoint,
}

impl FallbackDepth {
    pub fn resolve(self, near: f32, far: f32) -> f32 {
        match self {
            FallbackDepth::FarPlane => far,
            FallbackDepth::Midpoint => (near + far) * 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanConfig {
    pub strategy: PanStrategy,
    pub fallback_depth: FallbackDepth,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PanConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PanConfig::default();
        assert_eq!(config.strategy, PanStrategy::PlaneIntersection);
        assert_eq!(config.fallback_depth, FallbackDepth::FarPlane);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = PanConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PanConfig::default());
    }

    #[test]
    fn test_parse_variants() {
        let config = PanConfig::from_json_str(
            r#"{"strategy": "view_matrix_column", "fallback_depth": "midpoint"}"#,
        )
        .unwrap();
        assert_eq!(config.strategy, PanStrategy::ViewMatrixColumn);
        assert_eq!(config.fallback_depth, FallbackDepth::Midpoint);
    }

    #[test]
    fn test_unknown_strategy_is_error() {
        let err = PanConfig::from_json_str(r#"{"strategy": "helper_camera"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PanConfig::load("/nonexistent/vantage/pan.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_fallback_resolve() {
        assert_eq!(FallbackDepth::FarPlane.resolve(0.5, 100.0), 100.0);
        assert_eq!(FallbackDepth::Midpoint.resolve(0.5, 100.0), 50.25);
    }
}
