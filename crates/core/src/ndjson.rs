// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! NDJSON (newline-delimited JSON) decoding and encoding.
//!
//! History endpoints stream one JSON object per line. Blank lines are
//! skipped; any other line that fails to decode fails the whole body, since
//! a partially decoded transaction log would replay into a wrong history.

use std::fs;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Decodes every non-blank line of an NDJSON body.
///
/// Accepts `\n` and `\r\n` line endings. Fails with
/// [`Error::MalformedLine`] on the first line that does not decode,
/// reporting its 1-based line number.
pub fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>> {
    let mut records = Vec::new();

    for (index, line) in body.split(|b| *b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let record = serde_json::from_slice(line).map_err(|source| Error::MalformedLine {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Reads and decodes an NDJSON file.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let body = fs::read(path)?;
    parse(&body)
}

/// Encodes records as NDJSON, one object per line.
pub fn to_string<T: Serialize>(records: &[T]) -> Result<String> {
    let mut out = String::new();

    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
#[path = "ndjson_tests.rs"]
mod tests;
