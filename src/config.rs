//! Configuration file handling for cv-helper.
//!
//! Loads configuration from `<config dir>/cv-helper/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::codec::Fourcc;
use crate::keys::KeyBindings;

/// Configuration file structure for cv-helper.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct KeysConfig {
    /// Key that quits playback
    #[serde(default = "default_quit_key")]
    pub quit: char,
    /// Key that stops recording
    #[serde(default = "default_stop_key")]
    pub stop: char,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            quit: default_quit_key(),
            stop: default_stop_key(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct EncoderConfig {
    #[serde(default = "default_fourcc")]
    pub fourcc: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            fourcc: default_fourcc(),
        }
    }
}

/// Executable names or paths of the FFmpeg tools.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ToolsConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
    #[serde(default = "default_ffplay")]
    pub ffplay: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
            ffplay: default_ffplay(),
        }
    }
}

fn default_quit_key() -> char {
    'q'
}

fn default_stop_key() -> char {
    's'
}

fn default_fourcc() -> String {
    Fourcc::MP4V.to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_ffplay() -> String {
    "ffplay".to_string()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            log::debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            Self::parse(&content).map_err(|e| ConfigError::Parse { path, source: e })
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn key_bindings(&self) -> KeyBindings {
        KeyBindings {
            quit: self.keys.quit,
            stop: self.keys.stop,
        }
    }

    pub fn fourcc(&self) -> Result<Fourcc, ConfigError> {
        self.encoder
            .fourcc
            .parse()
            .map_err(|e: crate::HelperError| ConfigError::Invalid(e.to_string()))
    }
}

/// Contents written by `cv-helper config init`.
pub const DEFAULT_CONFIG: &str = r#"# cv-helper configuration

[keys]
# Key that quits video playback
quit = "q"
# Key that stops video recording
stop = "s"

[encoder]
# FourCC of the output codec: mp4v, xvid, avc1, h264, mjpg
fourcc = "mp4v"

[tools]
# FFmpeg executables (name on PATH or absolute path)
ffmpeg = "ffmpeg"
ffprobe = "ffprobe"
ffplay = "ffplay"
"#;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("cv-helper").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/cv-helper/config.toml")
        })
}
