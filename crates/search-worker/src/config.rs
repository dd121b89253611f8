//! Configuration loading for search-worker.

use chess_engine::search::{clamp_depth, DEFAULT_DEPTH, MAX_DEPTH};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory and its parents when no path is given.
pub const CONFIG_FILE: &str = "search-worker.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Level used when a job has none, or level 0.
    #[serde(default = "default_level")]
    pub default_level: u8,
    /// Ceiling applied to every job's level.
    #[serde(default = "default_max_level")]
    pub max_level: u8,
    /// Fixed seed for the root tie-break; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_level() -> u8 {
    DEFAULT_DEPTH
}

fn default_max_level() -> u8 {
    MAX_DEPTH
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            default_level: default_level(),
            max_level: default_max_level(),
            seed: None,
            log_filter: None,
        }
    }
}

impl WorkerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `path`, or the first `search-worker.toml` found in the working
    /// directory or its parents. Falls back to defaults when no file exists.
    ///
    /// Returns the config and the file it came from.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let candidates: Vec<PathBuf> = match path {
            Some(path) => vec![path.to_path_buf()],
            None => ["", "..", "../.."]
                .iter()
                .map(|dir| Path::new(dir).join(CONFIG_FILE))
                .filter(|candidate| candidate.exists())
                .collect(),
        };

        match candidates.into_iter().next() {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok((Self::from_toml_str(&content)?, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Search depth for a job's level: absent or zero means `default_level`,
    /// and the result never exceeds `max_level` or leaves 1 to 5.
    pub fn depth_for(&self, level: Option<i64>) -> u8 {
        let level = level
            .filter(|&level| level != 0)
            .unwrap_or(i64::from(self.default_level));
        let ceiling = clamp_depth(i64::from(self.max_level));
        clamp_depth(level).min(ceiling)
    }
}
