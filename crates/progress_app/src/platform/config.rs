use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use progress_engine::StreamSettings;
use progress_logging::{progress_info, progress_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "progress-monitor.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub results_path: String,
    pub connect_timeout_secs: Option<u64>,
    pub log_destination: LogDestination,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/stream-progress".to_string(),
            results_path: StreamSettings::default().results_path,
            connect_timeout_secs: None,
            log_destination: LogDestination::default(),
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            results_path: self.results_path.clone(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Loads `path`. A missing file yields defaults; unreadable or invalid files are errors.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            progress_warn!("No config at {:?}; using defaults", path);
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    progress_info!("Loaded config from {:?}", path);
    Ok(config)
}
