// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction map to displayable history.

use chrono::Duration;

use crate::classify::classify;
use crate::coalesce::coalesce_within;
use crate::compile::{chronological, TransactionMap};
use crate::event::HistoryEvent;

/// Builds a document's history from its compiled transactions.
///
/// Orders transactions oldest first, classifies them, coalesces adjacent
/// edits, and returns the events newest first.
pub fn history_events(
    document_id: &str,
    transactions: &TransactionMap,
    threshold: Duration,
) -> Vec<HistoryEvent> {
    let events = classify(document_id, &chronological(transactions));
    let mut events = coalesce_within(events, threshold);
    events.reverse();
    events
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
