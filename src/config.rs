//! Labeler configuration.
//!
//! All settings have defaults matching [`crate::constants`]. A JSON file can
//! override any subset of them; there is no automatically persisted config
//! file, the binary only reads one when asked to with `--config`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{dataset, gesture, label, zoom};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Filter string understood by `env_logger`.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Zoom limits and increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Smallest scale any zoom can reach
    pub min: f64,
    /// Largest scale reachable with keyboard and absolute zoom
    pub max_keyboard: f64,
    /// Largest scale reachable with the mouse wheel
    pub max_mouse: f64,
    /// Multiplicative keyboard step
    pub keyboard_step: f64,
    /// Multiplicative wheel step
    pub mouse_step: f64,
    /// Minimum time between accepted wheel zooms
    pub wheel_cooldown_ms: u64,
    /// Fraction of the canvas used by "fit"
    pub canvas_margin: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: zoom::MIN,
            max_keyboard: zoom::MAX_KEYBOARD,
            max_mouse: zoom::MAX_MOUSE,
            keyboard_step: zoom::KEYBOARD_STEP,
            mouse_step: zoom::MOUSE_STEP,
            wheel_cooldown_ms: zoom::WHEEL_COOLDOWN_MS,
            canvas_margin: zoom::CANVAS_MARGIN,
        }
    }
}

/// Complete labeler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    /// Directory holding source images
    pub images_dir: PathBuf,
    /// Directory holding one label file per image
    pub labels_dir: PathBuf,
    /// Zoom policy
    pub zoom: ZoomConfig,
    /// Minimum canvas size of a drawn box, both sides
    pub min_box_size: f64,
    /// Pointer movement ignored while panning
    pub pan_deadzone: f64,
    /// Class id given to new boxes
    pub default_class_id: u32,
    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(dataset::IMAGES_DIR),
            labels_dir: PathBuf::from(dataset::LABELS_DIR),
            zoom: ZoomConfig::default(),
            min_box_size: gesture::MIN_BOX_SIZE,
            pan_deadzone: gesture::PAN_DEADZONE,
            default_class_id: label::DEFAULT_CLASS_ID,
            log_level: LogLevel::default(),
        }
    }
}

impl LabelerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given image and label directories.
    pub fn with_dirs(
        mut self,
        images_dir: impl Into<PathBuf>,
        labels_dir: impl Into<PathBuf>,
    ) -> Self {
        self.images_dir = images_dir.into();
        self.labels_dir = labels_dir.into();
        self
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Check that the zoom policy and thresholds are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let z = &self.zoom;
        let values = [
            z.min,
            z.max_keyboard,
            z.max_mouse,
            z.keyboard_step,
            z.mouse_step,
            z.canvas_margin,
            self.min_box_size,
            self.pan_deadzone,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::invalid("zoom and gesture values must be finite"));
        }
        if z.min <= 0.0 {
            return Err(ConfigError::invalid("zoom.min must be positive"));
        }
        if z.max_keyboard <= z.min || z.max_mouse <= z.min {
            return Err(ConfigError::invalid(
                "zoom.max_keyboard and zoom.max_mouse must exceed zoom.min",
            ));
        }
        if z.keyboard_step <= 1.0 || z.mouse_step <= 1.0 {
            return Err(ConfigError::invalid("zoom steps must be greater than 1"));
        }
        if z.canvas_margin <= 0.0 || z.canvas_margin > 1.0 {
            return Err(ConfigError::invalid("zoom.canvas_margin must be in (0, 1]"));
        }
        if self.min_box_size < 0.0 || self.pan_deadzone < 0.0 {
            return Err(ConfigError::invalid(
                "min_box_size and pan_deadzone must not be negative",
            ));
        }
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
