//! Bridge configuration
//!
//! ```toml
//! [log]
//! tag = "MobileSurface"
//! level = "debug"
//!
//! [classes]
//! surface_view = "com/mobilesurface/AndroidMobileSurfaceView"
//!
//! [directories]
//! fonts = "/data/data/com.example/files/fonts"
//! ```
//!
//! Every section and key is optional.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML could not be parsed
    #[error("Invalid bridge config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Maximum log level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by log filters
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Logging settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Android log tag
    pub tag: String,
    /// Maximum level emitted
    pub level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            tag: "MobileSurface".to_string(),
            level: LogLevel::Debug,
        }
    }
}

/// JNI class paths whose native methods are registered at load time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassPaths {
    /// Java class of the engine's surface view
    pub surface_view: String,
    /// Application subclass of the surface view
    pub user_surface_view: String,
    /// Application class receiving process-wide natives
    pub mobile_app: String,
}

impl Default for ClassPaths {
    fn default() -> Self {
        Self {
            surface_view: "com/mobilesurface/AndroidMobileSurfaceView".to_string(),
            user_surface_view: "com/mobilesurface/AndroidUserMobileSurfaceView".to_string(),
            mobile_app: "com/mobilesurface/MobileApp".to_string(),
        }
    }
}

/// Engine resource directories applied when the app is created
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// CAD import libraries
    pub library: Option<PathBuf>,
    /// Fonts
    pub fonts: Option<PathBuf>,
    /// Material libraries
    pub materials: Option<PathBuf>,
}

/// Complete bridge configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Log level and tag
    pub log: LogConfig,
    /// Classes the native tables are registered on
    pub classes: ClassPaths,
    /// Engine resource directories applied when the app starts
    pub directories: DirectoryConfig,
}

impl BridgeConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}
