// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `docsync.toml` (or `--config`) and includes:
//! - `url`: WebSocket address of the document store
//! - `[sync]`: throttle window and stream buffer size for live queries
//! - `[history]`: edit coalescing threshold
//!
//! Every key is optional and a missing file means all defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use docsync_core::EDIT_COALESCE_THRESHOLD_SECS;

use crate::error::ConfigError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "docsync.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Document store address (`ws://...` or `wss://...`).
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Live query settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Throttle window for refetches after mutations, in milliseconds.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Items buffered per output stream before the producer waits.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

/// History settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Edits whose end times are closer than this merge into one event.
    #[serde(default = "default_coalesce_threshold_secs")]
    pub coalesce_threshold_secs: i64,
}

fn default_url() -> String {
    "ws://localhost:7890".to_string()
}

fn default_throttle_ms() -> u64 {
    1000
}

fn default_channel_capacity() -> usize {
    16
}

fn default_coalesce_threshold_secs() -> i64 {
    EDIT_COALESCE_THRESHOLD_SECS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: default_url(),
            sync: SyncConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            throttle_ms: default_throttle_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            coalesce_threshold_secs: default_coalesce_threshold_secs(),
        }
    }
}

impl SyncConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

impl HistoryConfig {
    /// Returns the coalescing threshold, saturating at the largest
    /// representable span.
    pub fn coalesce_threshold(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.coalesce_threshold_secs).unwrap_or(TimeDelta::MAX)
    }

    fn validate(&self) -> Result<(), String> {
        match TimeDelta::try_seconds(self.coalesce_threshold_secs) {
            Some(threshold) if threshold >= TimeDelta::zero() => Ok(()),
            _ => Err(format!(
                "[history] coalesce_threshold_secs = {} is out of range\n  hint: use a number of seconds between 0 and {}",
                self.coalesce_threshold_secs,
                TimeDelta::MAX.num_seconds()
            )),
        }
    }
}

impl Config {
    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse configuration text; `path` is only used in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .history
            .validate()
            .map_err(|message| ConfigError::Invalid {
                path: path.to_path_buf(),
                message,
            })?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
