//! Configuration loading for Yarrow.
//!
//! Settings live in `~/.yarrow/config.toml`. Every field is optional; a
//! missing file, a missing section, or a missing key falls back to the
//! defaults below, so a fresh install runs with no configuration at all.
//!
//! ```toml
//! [ollama]
//! base_url = "http://localhost:11434"
//! model = "FortuneQwen3_q8:4b"
//! temperature = 0.7
//!
//! [divination]
//! spread = 2.0
//!
//! [display]
//! narration = true
//! concise = true
//! type_interval_ms = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_DIR_NAME: &str = ".yarrow";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "FortuneQwen3_q8:4b";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_SPREAD: f64 = 2.0;
pub const DEFAULT_TYPE_INTERVAL_MS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YarrowConfig {
    pub ollama: OllamaSection,
    pub divination: DivinationSection,
    pub display: DisplaySection,
    /// Replacement hexagram data file; the embedded table is used when unset.
    pub data_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSection {
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    /// Request timeout for non-streaming calls; streams run unbounded.
    pub timeout_secs: Option<u64>,
}

impl Default for OllamaSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivinationSection {
    /// Standard deviation of the simulated hand-split error, in stalks.
    pub spread: f64,
}

impl Default for DivinationSection {
    fn default() -> Self {
        Self {
            spread: DEFAULT_SPREAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Replay the counting ceremony before showing the reading.
    pub narration: bool,
    /// Ask the model for the short reading format.
    pub concise: bool,
    /// Per-character delay of the typewriter effect.
    pub type_interval_ms: u64,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            narration: true,
            concise: true,
            type_interval_ms: DEFAULT_TYPE_INTERVAL_MS,
        }
    }
}

impl YarrowConfig {
    /// The configuration directory, `~/.yarrow`.
    #[must_use]
    pub fn dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME))
    }

    /// The configuration file path, `~/.yarrow/config.toml`.
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Load the user configuration, or defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from an explicit path; the file must exist and parse.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
