// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use serde_json::json;
use yare::parameterized;

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap()
}

#[parameterized(
    create = { json!({"create": {"_id": "post-1", "title": "Hello"}}), "create", Some("post-1") },
    create_if_not_exists = { json!({"createIfNotExists": {"_id": "drafts.post-1"}}), "createIfNotExists", Some("drafts.post-1") },
    create_or_replace = { json!({"createOrReplace": {"_id": "post-1"}}), "createOrReplace", Some("post-1") },
    create_squashed = { json!({"createSquashed": {"authors": ["a"], "mutations": []}}), "createSquashed", None },
    delete = { json!({"delete": {"id": "drafts.post-1"}}), "delete", Some("drafts.post-1") },
    patch = { json!({"patch": {"id": "drafts.post-1", "set": {"title": "x"}}}), "patch", Some("drafts.post-1") },
    future_shape = { json!({"archive": {"id": "post-1"}}), "unrecognized", None },
)]
fn mutation_decodes_by_key(value: serde_json::Value, kind: &str, target: Option<&str>) {
    let mutation: Mutation = serde_json::from_value(value).unwrap();
    assert_eq!(mutation.kind(), kind);
    assert_eq!(mutation.target_id(), target);
}

#[test]
fn mutation_keeps_document_fields() {
    let value = json!({"create": {"_id": "post-1", "_type": "post", "title": "Hello"}});
    let mutation: Mutation = serde_json::from_value(value.clone()).unwrap();

    match &mutation {
        Mutation::Create(body) => {
            assert_eq!(body.id, "post-1");
            assert_eq!(body.fields.get("title"), Some(&json!("Hello")));
        }
        other => panic!("expected create, got {other:?}"),
    }
    assert_eq!(serde_json::to_value(&mutation).unwrap(), value);
}

#[test]
fn transaction_uses_wire_field_names() {
    let tx = Transaction::new("rev-1", "user-a", at(0))
        .with_document_ids(["post-1", "drafts.post-1"])
        .with_mutations(vec![Mutation::patch("drafts.post-1")]);

    let value = serde_json::to_value(&tx).unwrap();
    assert_eq!(value["documentIDs"], json!(["post-1", "drafts.post-1"]));
    assert_eq!(value["mutations"][0]["patch"]["id"], json!("drafts.post-1"));
}

#[test]
fn with_document_ids_deduplicates() {
    let tx = Transaction::new("rev-1", "user-a", at(0)).with_document_ids(["a", "b", "a"]);
    assert_eq!(tx.document_ids, vec!["a", "b"]);
}

#[test]
fn absorb_concatenates_mutations_and_takes_later_timestamp() {
    let mut first = Transaction::new("rev-1", "user-a", at(0))
        .with_document_ids(["post-1"])
        .with_mutations(vec![Mutation::create("post-1")]);
    let later = Transaction::new("rev-1", "user-b", at(5))
        .with_document_ids(["drafts.post-1"])
        .with_mutations(vec![Mutation::delete("drafts.post-1")]);

    first.absorb(later);

    assert_eq!(
        first.mutations,
        vec![Mutation::create("post-1"), Mutation::delete("drafts.post-1")]
    );
    assert_eq!(first.timestamp, at(5));
    assert_eq!(first.author, "user-a");
    assert_eq!(first.document_ids, vec!["post-1", "drafts.post-1"]);
}

#[test]
fn absorb_keeps_duplicate_mutations() {
    let mut first = Transaction::new("rev-1", "user-a", at(0))
        .with_mutations(vec![Mutation::patch("post-1")]);
    let replay = first.clone();
    first.absorb(replay);
    assert_eq!(first.mutations.len(), 2);
}

#[test]
fn absorb_counts_folded_copies() {
    let mut first = Transaction::new("rev-1", "user-a", at(0));
    assert_eq!(first.copies(), 1);

    let mut second = first.clone();
    second.absorb(first.clone());
    first.absorb(second);
    assert_eq!(first.copies(), 3);
}

#[test]
fn decoded_transaction_is_a_single_copy() {
    let tx: Transaction = serde_json::from_value(json!({
        "id": "rev-1",
        "author": "user-a",
        "timestamp": "2024-03-01T12:00:00Z"
    }))
    .unwrap();
    assert_eq!(tx.copies(), 1);
}

#[test]
fn chronological_breaks_ties_by_id() {
    let a = Transaction::new("rev-a", "u", at(1));
    let b = Transaction::new("rev-b", "u", at(1));
    let c = Transaction::new("rev-0", "u", at(2));

    let mut txs = vec![c.clone(), b.clone(), a.clone()];
    txs.sort_by(Transaction::chronological);
    assert_eq!(txs, vec![a, b, c]);
}

#[parameterized(
    listed = { "post-1", true },
    written = { "drafts.post-1", true },
    unrelated = { "post-2", false },
)]
fn touches_listed_or_written_ids(id: &str, expected: bool) {
    let tx = Transaction::new("rev-1", "u", at(0))
        .with_document_ids(["post-1"])
        .with_mutations(vec![Mutation::patch("drafts.post-1")]);
    assert_eq!(tx.touches(id), expected);
}
