// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Classify transactions into history events by their mutation shape.
//!
//! Shapes are checked most specific first. A draft creation is a
//! `createIfNotExists` followed by a `patch`, so the generic "any patch
//! means edited" rule must come after the three two-mutation patterns.

use crate::draft::{is_draft_id, published_id};
use crate::event::{EventType, HistoryEvent};
use crate::transaction::{Mutation, Transaction};

/// Determines the event type for a transaction's mutation list.
pub fn event_type(mutations: &[Mutation]) -> EventType {
    match mutations {
        [Mutation::CreateIfNotExists(created), Mutation::Patch(patch)]
            if is_draft_id(&created.id) && is_draft_id(&patch.id) =>
        {
            EventType::Created
        }
        [Mutation::Create(created), Mutation::Delete(deleted)]
            if !is_draft_id(&created.id) && is_draft_id(&deleted.id) =>
        {
            EventType::Published
        }
        [Mutation::Delete(deleted), Mutation::CreateIfNotExists(created)]
            if !is_draft_id(&deleted.id) && is_draft_id(&created.id) =>
        {
            EventType::Unpublished
        }
        shape if shape.iter().any(|m| matches!(m, Mutation::Patch(_))) => EventType::Edited,
        _ => EventType::Unknown,
    }
}

/// Classifies each transaction, one event per transaction, input order kept.
///
/// Events are attributed to the published id of `document_id`.
pub fn classify(document_id: &str, transactions: &[Transaction]) -> Vec<HistoryEvent> {
    let document_id = published_id(document_id);
    transactions
        .iter()
        .map(|tx| HistoryEvent::from_transaction(event_type(single_copy(tx)), &document_id, tx))
        .collect()
}

/// Returns the mutations of one copy of a transaction that was folded
/// together with later copies of itself.
///
/// Folding the same payload k times concatenates its mutations k times; the
/// shape that was committed is the first period. A transaction folded only
/// once is taken as is, even when its own mutations repeat.
fn single_copy(tx: &Transaction) -> &[Mutation] {
    let copies = tx.copies();
    let len = tx.mutations.len();
    if copies < 2 || len % copies != 0 {
        return &tx.mutations;
    }
    let head = &tx.mutations[..len / copies];
    if tx.mutations.chunks(head.len().max(1)).all(|chunk| chunk == head) {
        head
    } else {
        &tx.mutations
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
