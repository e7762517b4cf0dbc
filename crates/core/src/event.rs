// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Classified, displayable history events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionId};

/// What a transaction did to a document, as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The draft was created.
    Created,
    /// The document was patched.
    Edited,
    /// The draft replaced the published copy.
    Published,
    /// The published copy was retired back into a draft.
    Unpublished,
    /// The mutation shape matched none of the known patterns.
    Unknown,
}

impl EventType {
    /// Returns the string representation used on the wire and in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Created => "created",
            EventType::Edited => "edited",
            EventType::Published => "published",
            EventType::Unpublished => "unpublished",
            EventType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a document's history.
///
/// Built from exactly one transaction; coalescing may later absorb it into
/// a neighbouring edit, in which case the survivor's window and author list
/// grow to cover it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Transaction id the event was classified from.
    pub rev: TransactionId,
    /// Published id of the document the history belongs to.
    pub document_id: String,
    /// Authors, deduplicated, in precedence order.
    pub user_ids: Vec<String>,
    /// Every transaction folded into this event, oldest first.
    pub transaction_ids: Vec<TransactionId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl HistoryEvent {
    /// Creates an event covering a single transaction.
    pub fn from_transaction(kind: EventType, document_id: &str, tx: &Transaction) -> Self {
        HistoryEvent {
            kind,
            rev: tx.id.clone(),
            document_id: document_id.to_string(),
            user_ids: vec![tx.author.clone()],
            transaction_ids: vec![tx.id.clone()],
            start_time: tx.timestamp,
            end_time: tx.timestamp,
        }
    }

    /// Returns true if the event still covers a single instant.
    pub fn is_instant(&self) -> bool {
        self.start_time == self.end_time
    }

    /// Returns true if the transaction is represented by this event.
    pub fn contains_rev(&self, rev: &str) -> bool {
        self.rev == rev || self.transaction_ids.iter().any(|id| id == rev)
    }
}

/// Finds the event that represents a revision, including absorbed edits.
pub fn find_event_for_rev<'a>(events: &'a [HistoryEvent], rev: &str) -> Option<&'a HistoryEvent> {
    events.iter().find(|event| event.contains_rev(rev))
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
