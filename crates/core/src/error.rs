// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for docsync-core operations.

use thiserror::Error;

/// All possible errors that can occur in docsync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed NDJSON at line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed mutation event: {0}")]
    MalformedEvent(String),

    #[error("conflicting history selectors\n  hint: pass either a time or a revision, not both")]
    ConflictingSelector,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for errors raised while decoding wire data.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::MalformedLine { .. } | Error::MalformedEvent(_) | Error::Json(_)
        )
    }
}

/// A specialized Result type for docsync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
