//! Application configuration.

use std::path::{Path, PathBuf};

use eyeline_overlay_model::{FrameSize, ReferenceAsset};
use serde::{Deserialize, Serialize};

use crate::error::{EyelineError, EyelineResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overlay image geometry.
    pub reference: ReferenceAsset,

    /// Default tracking parameters.
    pub tracking: TrackingDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default tracking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingDefaults {
    /// Number of samples averaged per smoothing channel.
    pub smoothing_window: usize,

    /// Square input size the detector resizes frames to.
    pub detector_input_size: u32,

    /// Minimum detector confidence for a face to count.
    pub detector_score_threshold: f64,

    /// Size of the displayed video; detections are rescaled into it.
    pub display_size: FrameSize,

    /// Apply the overlay transform on each detection.
    pub show_overlay: bool,

    /// Forward landmarks for debug drawing.
    pub show_landmarks: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "eyeline=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for TrackingDefaults {
    fn default() -> Self {
        Self {
            smoothing_window: 3,
            detector_input_size: 416,
            detector_score_threshold: 0.5,
            display_size: FrameSize::new(480, 360),
            show_overlay: true,
            show_landmarks: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Errors are not swallowed.
    pub fn load_from(path: impl AsRef<Path>) -> EyelineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EyelineError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Reject values the tracking pipeline cannot run with.
    pub fn validate(&self) -> EyelineResult<()> {
        if self.tracking.smoothing_window == 0 {
            return Err(EyelineError::config("smoothing_window must be at least 1"));
        }
        if self.tracking.display_size.is_empty() {
            return Err(EyelineError::config("display_size must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.tracking.detector_score_threshold) {
            return Err(EyelineError::config(
                "detector_score_threshold must be within [0.0, 1.0]",
            ));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("eyeline").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("eyeline-config-{}-{name}", std::process::id()))
            .join("config.json")
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tracking.smoothing_window, 3);
        assert_eq!(config.tracking.display_size, FrameSize::new(480, 360));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"tracking":{"show_landmarks":false}}"#).unwrap();
        assert!(!config.tracking.show_landmarks);
        assert!(config.tracking.show_overlay);
        assert_eq!(config.tracking.detector_input_size, 416);
        assert_eq!(config.reference, ReferenceAsset::default());
    }

    #[test]
    fn test_save_and_load_from() {
        let path = temp_path("roundtrip");
        let mut config = AppConfig::default();
        config.tracking.smoothing_window = 5;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.tracking.smoothing_window, 5);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = AppConfig::load_from(temp_path("missing")).unwrap_err();
        assert!(matches!(err, EyelineError::FileNotFound { .. }));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = AppConfig::default();
        config.tracking.smoothing_window = 0;
        assert!(config.validate().is_err());
    }
}
