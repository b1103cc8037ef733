//! Configuration management
//!
//! Every default equals the constant the viewer was originally hard-coded
//! with, so a run without any configuration behaves identically.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Network input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// UDP port to listen on for the RTP stream
    pub port: u16,
    /// RTP payload type announced by the sender
    pub payload_type: i32,
    /// RTP encoding-name expected on incoming packets
    pub encoding: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: 1181,
            payload_type: 26,
            encoding: "JPEG".to_string(),
        }
    }
}

/// Display output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width the video is scaled to before display
    pub width: i32,
    /// Height the video is scaled to before display
    pub height: i32,
    /// Video sink: "auto" or an explicit element factory name
    pub sink: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            sink: "auto".to_string(),
        }
    }
}

/// Overlay drawing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Stroke width of the marker line
    pub line_width: f64,
    /// Stroke color as RGBA, each channel in 0.0..=1.0
    pub color: [f64; 4],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            line_width: 0.5,
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub display: DisplayConfig,
    pub overlay: OverlayConfig,
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileReadError(path.to_path_buf(), e))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_toml_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(format!("TOML serialize error: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::FileWriteError(path.to_path_buf(), e))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.port == 0 {
            return Err(ConfigError::InvalidValue(
                "port must be greater than 0".to_string(),
            ));
        }

        // RTP payload types occupy seven bits
        if !(0..=127).contains(&self.network.payload_type) {
            return Err(ConfigError::InvalidValue(format!(
                "payload_type must be between 0 and 127, got {}",
                self.network.payload_type
            )));
        }

        if self.network.encoding.is_empty() {
            return Err(ConfigError::InvalidValue(
                "encoding must not be empty".to_string(),
            ));
        }

        if self.display.width <= 0 || self.display.height <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "display dimensions must be greater than 0, got {}x{}",
                self.display.width, self.display.height
            )));
        }

        if self.display.sink.is_empty() {
            return Err(ConfigError::InvalidValue(
                "sink must not be empty".to_string(),
            ));
        }

        if self.overlay.line_width <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "line_width must be greater than 0.0, got {}",
                self.overlay.line_width
            )));
        }

        for channel in self.overlay.color {
            if !(0.0..=1.0).contains(&channel) {
                return Err(ConfigError::InvalidValue(format!(
                    "color channels must be between 0.0 and 1.0, got {}",
                    channel
                )));
            }
        }

        Ok(())
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileReadError(PathBuf, std::io::Error),

    #[error("Failed to write config file {0}: {1}")]
    FileWriteError(PathBuf, std::io::Error),

    #[error("Config parse error: {0}")]
    ParseError(String),

    #[error("Config serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
