// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

use crate::sync::TransportError;

/// Errors surfaced on live query and history streams.
///
/// Every variant is terminal: once a stream yields an error it ends.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The subscription could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A history body or realtime event could not be decoded.
    #[error(transparent)]
    Decode(#[from] docsync_core::Error),
}

/// Result type for stream items.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}\n  hint: see docsync.toml keys url, [sync], [history]", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

/// Errors returned by the `docsync` command line.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Core(#[from] docsync_core::Error),

    #[error("invalid param '{0}'\n  hint: use key=value, where value is JSON or a bare string")]
    InvalidParam(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
