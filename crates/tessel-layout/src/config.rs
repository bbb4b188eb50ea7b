//! Engine tuning as data.
//!
//! [`EngineConfig`] collects every knob the engine consults. Defaults match
//! the engine's built-in constants, so `EngineConfig::default()` behaves the
//! same as not configuring anything.
//!
//! # Loading
//!
//! ```toml
//! # tessel.toml
//! stack_zone_fraction = 0.25
//! detection_size = 48.0
//! split_sizing = "target_share"
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("tessel.toml")?.into_validated()?;
//! ```

#[cfg(feature = "config-files")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ops::SplitSizing;
use crate::placement::DEFAULT_STACK_ZONE_FRACTION;

/// Default bound on each screen's error log.
pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 64;

/// Layout engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Half-extent of the central "stack" drop zone as a fraction of the
    /// target's width and height.
    pub stack_zone_fraction: f64,
    /// Maximum edge distance for nearest-target fallback while dragging.
    /// `None` means unlimited.
    pub detection_size: Option<f64>,
    /// Allow stacking areas whose roles differ.
    pub allow_mixed_roles: bool,
    /// Weight redistribution for same-orientation splits.
    pub split_sizing: SplitSizing,
    /// Oldest entries are dropped once a screen's error log reaches this.
    pub error_log_capacity: usize,
    /// Kind given to areas the engine creates on its own (new screens).
    pub default_area_kind: String,
    /// Row sizes summing to at most this are rejected.
    pub size_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stack_zone_fraction: DEFAULT_STACK_ZONE_FRACTION,
            detection_size: None,
            allow_mixed_roles: false,
            split_sizing: SplitSizing::default(),
            error_log_capacity: DEFAULT_ERROR_LOG_CAPACITY,
            default_area_kind: "empty".to_owned(),
            size_epsilon: 1e-6,
        }
    }
}

impl EngineConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every parameter is in range.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.stack_zone_fraction >= 0.0 && self.stack_zone_fraction <= 0.5) {
            errors.push(format!(
                "stack_zone_fraction must be in [0, 0.5], got {}",
                self.stack_zone_fraction
            ));
        }

        if let Some(size) = self.detection_size {
            if !size.is_finite() || size < 0.0 {
                errors.push(format!(
                    "detection_size must be a finite non-negative number, got {size}"
                ));
            }
        }

        if self.error_log_capacity == 0 {
            errors.push("error_log_capacity must be > 0".into());
        }

        if self.default_area_kind.trim().is_empty() {
            errors.push("default_area_kind must not be empty".into());
        }

        if !self.size_epsilon.is_finite() || self.size_epsilon < 0.0 {
            errors.push(format!(
                "size_epsilon must be a finite non-negative number, got {}",
                self.size_epsilon
            ));
        }

        errors
    }

    /// Return `self` if [`Self::validate`] finds nothing.
    pub fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors raised while loading or validating an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),
    #[cfg(feature = "config-files")]
    #[error("JSON parse error: {0}")]
    Json(#[source] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates_clean() {
        let errors = EngineConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn defaults_match_engine_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.stack_zone_fraction, 0.3);
        assert_eq!(config.detection_size, None);
        assert!(!config.allow_mixed_roles);
        assert_eq!(config.split_sizing, SplitSizing::AdjacentNeighbors);
        assert_eq!(config.error_log_capacity, 64);
        assert_eq!(config.default_area_kind, "empty");
    }

    #[test]
    fn validate_catches_bad_fraction() {
        let config = EngineConfig {
            stack_zone_fraction: 0.75,
            ..EngineConfig::default()
        };
        assert!(config.validate().iter().any(|e| e.contains("stack_zone_fraction")));

        let nan = EngineConfig {
            stack_zone_fraction: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(!nan.validate().is_empty());
    }

    #[test]
    fn validate_catches_negative_detection_size() {
        let config = EngineConfig {
            detection_size: Some(-1.0),
            ..EngineConfig::default()
        };
        assert!(config.validate().iter().any(|e| e.contains("detection_size")));
    }

    #[test]
    fn validate_catches_zero_capacity() {
        let config = EngineConfig {
            error_log_capacity: 0,
            ..EngineConfig::default()
        };
        let err = config.into_validated().expect_err("capacity 0 is invalid");
        assert!(err.to_string().contains("error_log_capacity"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"allow_mixed_roles": true, "split_sizing": "target_share"}"#)
                .expect("valid json");
        assert!(config.allow_mixed_roles);
        assert_eq!(config.split_sizing, SplitSizing::TargetShare);
        assert_eq!(config.error_log_capacity, DEFAULT_ERROR_LOG_CAPACITY);
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn toml_roundtrip_through_loader() {
        let config = EngineConfig::from_toml_str(
            "stack_zone_fraction = 0.25\ndetection_size = 48.0\ndefault_area_kind = \"blank\"\n",
        )
        .expect("valid toml");
        assert_eq!(config.stack_zone_fraction, 0.25);
        assert_eq!(config.detection_size, Some(48.0));
        assert_eq!(config.default_area_kind, "blank");
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::from_json_file("/nonexistent/tessel.json").expect_err("no file");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
