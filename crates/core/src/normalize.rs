// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical transactions from either history bodies or realtime events.
//!
//! History endpoints already speak the canonical shape, one transaction per
//! NDJSON line. Realtime mutation events name the same facts differently
//! (`transactionId`, `identity`) and do not list the touched documents, so
//! the caller supplies the ids it subscribed for.

use crate::error::{Error, Result};
use crate::ndjson;
use crate::protocol::MutationEvent;
use crate::transaction::Transaction;

/// Decodes a transaction log body.
///
/// A malformed line fails the whole body.
pub fn from_ndjson(body: &[u8]) -> Result<Vec<Transaction>> {
    ndjson::parse(body)
}

/// Builds a transaction from a realtime mutation event.
///
/// Fails with [`Error::MalformedEvent`] when the event lacks its
/// transaction id, author, or timestamp. A missing mutation list is read
/// as empty.
pub fn from_mutation_event(event: &MutationEvent, document_ids: &[String]) -> Result<Transaction> {
    let id = event
        .transaction_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::MalformedEvent("missing transactionId".to_string()))?;
    let author = event
        .identity
        .as_deref()
        .ok_or_else(|| Error::MalformedEvent(format!("transaction {id}: missing identity")))?;
    let timestamp = event
        .timestamp
        .ok_or_else(|| Error::MalformedEvent(format!("transaction {id}: missing timestamp")))?;

    Ok(Transaction::new(id, author, timestamp)
        .with_document_ids(document_ids.iter().cloned())
        .with_mutations(event.mutations.clone().unwrap_or_default()))
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
