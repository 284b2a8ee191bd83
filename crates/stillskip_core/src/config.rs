//! Settings for external tools and encoding parameters.
//!
//! Settings are organized into TOML tables. Every field has a default, so
//! a missing file or a partial file is always usable; the CLI applies its
//! own override flags after loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// External tool binaries.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Video encoder parameters.
    #[serde(default)]
    pub encoder: EncoderSettings,

    /// Audio re-timing parameters.
    #[serde(default)]
    pub audio: AudioSettings,
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// Missing fields take their defaults; a missing file is an error
    /// (callers that treat the file as optional use `Settings::default()`).
    pub fn load(path: &Path) -> ConfigResult<Settings> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Names of the external collaborator binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Decoder/encoder/demuxer binary.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// Audio resampler binary.
    #[serde(default = "default_sox")]
    pub sox: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_sox() -> String {
    "sox".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            sox: default_sox(),
        }
    }
}

/// Parameters for the final encode stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Video codec handed to the encoder.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Constant rate factor for the encode.
    #[serde(default = "default_crf")]
    pub crf: u32,
}

fn default_codec() -> String {
    "libx264".to_string()
}

fn default_crf() -> u32 {
    16
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            crf: default_crf(),
        }
    }
}

/// Parameters for the audio re-timing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Reference sample rate restored after a speed change.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_sample_rate() -> u32 {
    44100
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}
