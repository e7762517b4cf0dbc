// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Draft and published document ids.
//!
//! A document's working copy lives under `drafts.<id>`, its published copy
//! under `<id>`. Both physical ids name the same logical document.

/// Prefix marking the draft copy of a document.
pub const DRAFTS_PREFIX: &str = "drafts.";

/// Returns true if the id names a draft copy.
pub fn is_draft_id(id: &str) -> bool {
    id.starts_with(DRAFTS_PREFIX)
}

/// Returns the draft id for a document, whichever id form is given.
pub fn draft_id(id: &str) -> String {
    if is_draft_id(id) {
        id.to_string()
    } else {
        format!("{DRAFTS_PREFIX}{id}")
    }
}

/// Returns the published id for a document, whichever id form is given.
pub fn published_id(id: &str) -> String {
    id.strip_prefix(DRAFTS_PREFIX).unwrap_or(id).to_string()
}

/// Returns `[published, draft]` for a document.
pub fn id_pair(id: &str) -> [String; 2] {
    [published_id(id), draft_id(id)]
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;
