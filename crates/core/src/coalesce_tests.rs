// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::transaction::Transaction;
use chrono::{DateTime, TimeZone, Utc};
use yare::parameterized;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn event(kind: EventType, rev: &str, author: &str, minutes: i64) -> HistoryEvent {
    let tx = Transaction::new(rev, author, t0() + Duration::minutes(minutes));
    HistoryEvent::from_transaction(kind, "post-1", &tx)
}

fn edit(rev: &str, author: &str, minutes: i64) -> HistoryEvent {
    event(EventType::Edited, rev, author, minutes)
}

#[test]
fn threshold_is_twenty_five_minutes() {
    assert_eq!(
        Duration::seconds(EDIT_COALESCE_THRESHOLD_SECS),
        Duration::minutes(25)
    );
}

#[test]
fn burst_of_edits_splits_at_threshold() {
    let events = vec![edit("e1", "a", 0), edit("e2", "b", 2), edit("e3", "c", 40)];

    let out = coalesce(events);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].rev, "e2");
    assert_eq!(out[0].user_ids, vec!["b", "a"]);
    assert_eq!(out[0].start_time, t0());
    assert_eq!(out[0].end_time, t0() + Duration::minutes(2));
    assert_eq!(out[0].transaction_ids, vec!["e1", "e2"]);
    assert_eq!(out[1], edit("e3", "c", 40));
}

#[parameterized(
    just_inside = { 24, 1 },
    at_threshold = { 25, 2 },
    beyond = { 26, 2 },
)]
fn gap_comparison_is_strict(gap_minutes: i64, expected_len: usize) {
    let out = coalesce(vec![edit("e1", "a", 0), edit("e2", "a", gap_minutes)]);
    assert_eq!(out.len(), expected_len);
}

#[test]
fn authors_are_deduplicated_with_later_author_first() {
    let out = coalesce(vec![edit("e1", "a", 0), edit("e2", "b", 1), edit("e3", "a", 2)]);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].rev, "e3");
    assert_eq!(out[0].user_ids, vec!["a", "b"]);
    assert_eq!(out[0].transaction_ids, vec!["e1", "e2", "e3"]);
}

#[test]
fn extended_event_does_not_move_start_again() {
    let out = coalesce(vec![edit("e1", "a", 0), edit("e2", "a", 5), edit("e3", "a", 10)]);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].start_time, t0() + Duration::minutes(10));
    assert_eq!(out[0].end_time, t0() + Duration::minutes(10));
}

#[parameterized(
    created_then_edited = { EventType::Created, EventType::Edited },
    edited_then_published = { EventType::Edited, EventType::Published },
    edited_then_unknown = { EventType::Edited, EventType::Unknown },
    unpublished_then_edited = { EventType::Unpublished, EventType::Edited },
)]
fn only_edit_pairs_merge(first: EventType, second: EventType) {
    let events = vec![event(first, "r1", "a", 0), event(second, "r2", "b", 1)];
    let out = coalesce(events.clone());
    assert_eq!(out, events);
}

#[test]
fn custom_threshold() {
    let events = vec![edit("e1", "a", 0), edit("e2", "b", 3)];

    assert_eq!(coalesce_within(events.clone(), Duration::minutes(2)).len(), 2);
    assert_eq!(coalesce_within(events, Duration::minutes(4)).len(), 1);
}

#[test]
fn empty_and_single_inputs() {
    assert!(coalesce(Vec::new()).is_empty());
    let single = vec![edit("e1", "a", 0)];
    assert_eq!(coalesce(single.clone()), single);
}
