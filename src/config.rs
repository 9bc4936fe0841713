/*!
 * Transfer configuration
 */

use std::fs;
use std::path::{Path, PathBuf};

use comet_core_chunker::DEFAULT_BLOCK_SIZE;
use comet_core_manifest::DEFAULT_FANOUT;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{CometError, Result};

/// Log verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to a tracing level
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Configuration for a transfer endpoint, producer or consumer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Repository directory holding content-addressed entries
    pub repo_dir: PathBuf,

    /// Published content name, e.g. `icn:/producer/file`
    pub locator: String,

    /// Chunk size in bytes for ingested files
    pub block_size: usize,

    /// Hash-group fan-out
    pub fan_out: usize,

    /// Log verbosity
    pub log_level: LogLevel,

    /// Optional log file (JSON lines); stdout when unset
    pub log_file: Option<PathBuf>,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from("repo"),
            locator: "icn:/comet/file".to_string(),
            block_size: DEFAULT_BLOCK_SIZE,
            fan_out: DEFAULT_FANOUT,
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl TransferConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| CometError::config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for usable values
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(CometError::config("block_size must be positive"));
        }
        if self.fan_out < 2 {
            return Err(CometError::config(format!(
                "fan_out must be at least 2, got {}",
                self.fan_out
            )));
        }
        if self.locator.is_empty() {
            return Err(CometError::config("locator cannot be empty"));
        }
        Ok(())
    }
}
