//! Application configuration.
//!
//! Every tunable constant of the analysis pipeline lives here as a named
//! field with a documented default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BowsyncError, BowsyncResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bow-direction extraction settings.
    pub direction: DirectionConfig,

    /// Audio silence and note-event settings.
    pub silence: SilenceConfig,

    /// Stream synchronization settings.
    pub sync: SyncConfig,

    /// Overlay cue geometry.
    pub overlay: OverlayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Which sign convention maps projected motion to Up/Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionPolarity {
    /// Decreasing projection is always `Up`.
    #[default]
    Fixed,
    /// Flip polarity when the dominant axis is closer to image-horizontal.
    AxisAware,
}

/// Direction extractor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionConfig {
    /// Keypoint index selected from the keypoint table.
    pub keypoint_index: u32,

    /// Majority-vote smoothing window (number of labels).
    pub window_size: usize,

    /// Up/Down sign convention.
    pub polarity: DirectionPolarity,
}

/// Strategy used to decide whether a pitch sample is silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceStrategy {
    /// Short-time spectral energy of the raw waveform.
    #[default]
    EnergyBased,
    /// Voicing confidence reported by the pitch estimator.
    ConfidenceBased,
}

/// Instrument frequency range presets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    #[default]
    Cello,
    Violin,
    Custom { min_hz: f64, max_hz: f64 },
}

impl Instrument {
    /// Approximate playable fundamental range in Hz.
    pub fn range_hz(&self) -> (f64, f64) {
        match *self {
            Instrument::Cello => (65.0, 1047.0),
            Instrument::Violin => (196.0, 3136.0),
            Instrument::Custom { min_hz, max_hz } => (min_hz, max_hz),
        }
    }

    /// Whether a frequency lies inside the instrument's range (inclusive).
    pub fn contains(&self, hz: f64) -> bool {
        let (lo, hi) = self.range_hz();
        hz >= lo && hz <= hi
    }
}

/// Silence detection and note classification parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceConfig {
    /// Which silence detector to use.
    pub strategy: SilenceStrategy,

    /// Normalized energy below which a window is silent.
    pub energy_threshold: f64,

    /// Voicing confidence below which a sample is silent.
    pub confidence_threshold: f64,

    /// Frame rate the pitch samples were produced at.
    pub target_fps: f64,

    /// Instrument whose range bounds note naming.
    pub instrument: Instrument,

    /// Treat voiced frequencies outside the instrument range as undefined notes.
    pub restrict_to_range: bool,
}

/// Stream synchronizer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Frames added to direction segments to reach the event numbering.
    pub frame_offset: i64,

    /// Minimum consecutive silent events promoted to a silence annotation.
    pub min_silence_run: usize,
}

/// Overlay cue geometry, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Distance of the cue anchor from the right edge of the frame.
    pub anchor_inset: i32,

    /// Arrow length.
    pub arrow_length: i32,

    /// Length of the silence marker line.
    pub silence_marker_length: i32,

    /// Stroke thickness.
    pub thickness: i32,

    /// Arrow tip length as a fraction of the arrow length.
    pub tip_length: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "bowsync=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            keypoint_index: 0,
            window_size: 5,
            polarity: DirectionPolarity::Fixed,
        }
    }
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            strategy: SilenceStrategy::EnergyBased,
            energy_threshold: 0.005,
            confidence_threshold: 0.6,
            target_fps: 30.0,
            instrument: Instrument::Cello,
            restrict_to_range: false,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            frame_offset: 300,
            min_silence_run: 6,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            anchor_inset: 150,
            arrow_length: 300,
            silence_marker_length: 300,
            thickness: 3,
            tip_length: 0.4,
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

    /// Load config from an explicit path. Missing fields take their defaults.
    pub fn load_from(path: &Path) -> BowsyncResult<Self> {
        if !path.exists() {
            return Err(BowsyncError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Reject values no analysis stage can work with.
    pub fn validate(&self) -> BowsyncResult<()> {
        if !(self.silence.target_fps.is_finite() && self.silence.target_fps > 0.0) {
            return Err(BowsyncError::config(format!(
                "target_fps must be positive, got {}",
                self.silence.target_fps
            )));
        }
        if !(0.0..=1.0).contains(&self.silence.energy_threshold) {
            return Err(BowsyncError::config(format!(
                "energy_threshold must be in [0, 1], got {}",
                self.silence.energy_threshold
            )));
        }
        let (lo, hi) = self.silence.instrument.range_hz();
        if !(lo > 0.0 && lo < hi) {
            return Err(BowsyncError::config(format!(
                "instrument range must satisfy 0 < min < max, got {lo}..{hi}"
            )));
        }
        if self.sync.min_silence_run == 0 {
            return Err(BowsyncError::config("min_silence_run must be at least 1"));
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
    base.join("bowsync").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = AppConfig::default();
        assert_eq!(config.direction.window_size, 5);
        assert_eq!(config.direction.polarity, DirectionPolarity::Fixed);
        assert_eq!(config.sync.frame_offset, 300);
        assert_eq!(config.sync.min_silence_run, 6);
        assert!((config.silence.energy_threshold - 0.005).abs() < 1e-12);
        assert!((config.silence.confidence_threshold - 0.6).abs() < 1e-12);
        assert!((config.silence.target_fps - 30.0).abs() < 1e-12);
        assert_eq!(config.silence.strategy, SilenceStrategy::EnergyBased);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "sync": { "frame_offset": 120 }, "direction": { "polarity": "axis_aware" } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.sync.frame_offset, 120);
        assert_eq!(config.sync.min_silence_run, 6);
        assert_eq!(config.direction.polarity, DirectionPolarity::AxisAware);
        assert_eq!(config.direction.window_size, 5);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.silence.instrument = Instrument::Violin;
        config.silence.strategy = SilenceStrategy::ConfidenceBased;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_path_is_not_found() {
        let err = AppConfig::load_from(Path::new("/nonexistent/bowsync.json")).unwrap_err();
        assert!(matches!(err, BowsyncError::FileNotFound { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let mut config = AppConfig::default();
        config.silence.target_fps = 0.0;
        assert!(matches!(
            config.validate(),
            Err(BowsyncError::Config { .. })
        ));
    }

    #[test]
    fn test_instrument_ranges() {
        assert_eq!(Instrument::Cello.range_hz(), (65.0, 1047.0));
        assert_eq!(Instrument::Violin.range_hz(), (196.0, 3136.0));
        assert!(Instrument::Violin.contains(440.0));
        assert!(!Instrument::Violin.contains(100.0));
        let custom = Instrument::Custom {
            min_hz: 40.0,
            max_hz: 400.0,
        };
        assert!(custom.contains(40.0));
        assert!(!custom.contains(400.5));
    }
}
