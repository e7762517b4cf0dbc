// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn tx(id: &str, author: &str) -> Transaction {
    Transaction::new(id, author, Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
}

#[parameterized(
    created = { EventType::Created, "created" },
    edited = { EventType::Edited, "edited" },
    published = { EventType::Published, "published" },
    unpublished = { EventType::Unpublished, "unpublished" },
    unknown = { EventType::Unknown, "unknown" },
)]
fn event_type_display(kind: EventType, expected: &str) {
    assert_eq!(kind.to_string(), expected);
    assert_eq!(
        serde_json::to_value(kind).unwrap(),
        serde_json::json!(expected)
    );
}

#[test]
fn from_transaction_covers_one_instant() {
    let event = HistoryEvent::from_transaction(EventType::Edited, "post-1", &tx("rev-1", "alice"));

    assert_eq!(event.rev, "rev-1");
    assert_eq!(event.document_id, "post-1");
    assert_eq!(event.user_ids, vec!["alice"]);
    assert_eq!(event.transaction_ids, vec!["rev-1"]);
    assert!(event.is_instant());
}

#[test]
fn serializes_with_camel_case_fields() {
    let event = HistoryEvent::from_transaction(EventType::Published, "post-1", &tx("rev-1", "a"));
    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["type"], "published");
    assert_eq!(value["userIds"], serde_json::json!(["a"]));
    assert!(value.get("startTime").is_some());
    assert!(value.get("endTime").is_some());
}

#[test]
fn find_event_for_rev_matches_absorbed_transactions() {
    let mut merged = HistoryEvent::from_transaction(EventType::Edited, "post-1", &tx("rev-2", "b"));
    merged.transaction_ids.insert(0, "rev-1".to_string());
    let other = HistoryEvent::from_transaction(EventType::Created, "post-1", &tx("rev-0", "a"));
    let events = vec![merged.clone(), other.clone()];

    assert_eq!(find_event_for_rev(&events, "rev-1"), Some(&merged));
    assert_eq!(find_event_for_rev(&events, "rev-2"), Some(&merged));
    assert_eq!(find_event_for_rev(&events, "rev-0"), Some(&other));
    assert_eq!(find_event_for_rev(&events, "rev-9"), None);
}
