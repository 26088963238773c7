//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ActsyncError, ActsyncResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log alignment and action compression parameters.
    pub sync: SyncConfig,

    /// Calibration marker detection parameters.
    pub marker: MarkerConfig,

    /// Session folder discovery.
    pub session: SessionConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Clock alignment and compression parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tag whose first occurrence in the log is the anchor chord.
    pub anchor_tag: String,

    /// Minimum lead-in/lead-out of each caption (ms).
    pub pre_roll_ms: i64,
}

/// Marker detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Reference patch color as RGB.
    pub reference_rgb: [u8; 3],

    /// Allowed per-channel deviation from the reference color.
    pub tolerance: u8,

    /// Side length of the square sampling window (pixels).
    pub window_size: u32,

    /// How far above the frame center the window is placed (pixels).
    pub vertical_offset_px: u32,

    /// Upper bound on scanned video time (seconds).
    pub scan_secs: f64,
}

/// Session folder discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Recognized video container extensions, in preference order.
    pub video_extensions: Vec<String>,

    /// Extension of the raw event log.
    pub log_extension: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "actsync=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            anchor_tag: "<Ctrl>".to_string(),
            pre_roll_ms: 150,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            reference_rgb: [173, 216, 231],
            tolerance: 30,
            window_size: 20,
            vertical_offset_px: 100,
            scan_secs: 100.0,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            video_extensions: vec!["mp4".to_string(), "mkv".to_string()],
            log_extension: "txt".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
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

    /// Load config from an explicit path. Missing fields take defaults.
    pub fn load_from(path: &Path) -> ActsyncResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> ActsyncResult<()> {
        if self.sync.anchor_tag.trim().is_empty() {
            return Err(ActsyncError::config("sync.anchor_tag must not be empty"));
        }
        if self.sync.pre_roll_ms < 0 {
            return Err(ActsyncError::config("sync.pre_roll_ms must be >= 0"));
        }
        if self.marker.window_size == 0 {
            return Err(ActsyncError::config("marker.window_size must be > 0"));
        }
        if self.marker.scan_secs.is_nan() || self.marker.scan_secs <= 0.0 {
            return Err(ActsyncError::config("marker.scan_secs must be > 0"));
        }
        if self.session.video_extensions.is_empty() {
            return Err(ActsyncError::config(
                "session.video_extensions must list at least one extension",
            ));
        }
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("actsync").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "sync": { "anchor_tag": "<Alt>" }, "marker": { "tolerance": 12 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.sync.anchor_tag, "<Alt>");
        assert_eq!(config.sync.pre_roll_ms, 150);
        assert_eq!(config.marker.tolerance, 12);
        assert_eq!(config.marker.reference_rgb, [173, 216, 231]);
        assert_eq!(config.session.video_extensions, vec!["mp4", "mkv"]);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "marker": { "window_size": 0 } }"#).unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ActsyncError::Config { .. }));
    }

    #[test]
    fn test_load_from_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.sync.pre_roll_ms = 200;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }
}
