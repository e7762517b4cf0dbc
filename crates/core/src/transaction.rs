// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transactions and the mutations they carry.
//!
//! A transaction is one atomic server-side commit. Its mutations are kept
//! in the wire shape the server logs them in: each mutation is a JSON object
//! with exactly one key naming the variant, e.g.
//! `{"createIfNotExists": {"_id": "drafts.post-1", ...}}` or
//! `{"patch": {"id": "drafts.post-1", "set": {...}}}`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unique identifier of a transaction (the server's revision id).
pub type TransactionId = String;

/// One atomic commit against the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Stable, globally unique commit id.
    pub id: TransactionId,
    /// User id of whoever performed the commit.
    pub author: String,
    /// Documents touched by the commit, published and draft ids alike.
    #[serde(rename = "documentIDs", default)]
    pub document_ids: Vec<String>,
    /// Mutations in the order they were applied.
    #[serde(default)]
    pub mutations: Vec<Mutation>,
    /// When the commit was applied.
    pub timestamp: DateTime<Utc>,
    /// Number of later observations folded in by [`Transaction::absorb`].
    #[serde(skip)]
    folds: usize,
}

impl Transaction {
    /// Creates a transaction with no mutations and no document ids.
    pub fn new(
        id: impl Into<TransactionId>,
        author: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Transaction {
            id: id.into(),
            author: author.into(),
            document_ids: Vec::new(),
            mutations: Vec::new(),
            timestamp,
            folds: 0,
        }
    }

    /// Sets the mutations (builder pattern).
    pub fn with_mutations(mut self, mutations: Vec<Mutation>) -> Self {
        self.mutations = mutations;
        self
    }

    /// Sets the touched document ids (builder pattern).
    pub fn with_document_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document_ids.clear();
        for id in ids {
            push_unique(&mut self.document_ids, id.into());
        }
        self
    }

    /// Folds a later observation of the same transaction into this one.
    ///
    /// Mutations are concatenated in arrival order without deduplication and
    /// the later timestamp wins. Author and id are kept from the first record.
    pub fn absorb(&mut self, later: Transaction) {
        self.folds += later.folds + 1;
        self.mutations.extend(later.mutations);
        self.timestamp = later.timestamp;
        for id in later.document_ids {
            push_unique(&mut self.document_ids, id);
        }
    }

    /// Returns how many observations of this transaction were folded
    /// together; 1 for a record that never absorbed another.
    pub fn copies(&self) -> usize {
        self.folds + 1
    }

    /// Returns true if the transaction lists `id` or writes to it.
    pub fn touches(&self, id: &str) -> bool {
        self.document_ids.iter().any(|d| d == id)
            || self.mutations.iter().any(|m| m.target_id() == Some(id))
    }

    /// Orders transactions by timestamp, breaking ties by id.
    pub fn chronological(a: &Transaction, b: &Transaction) -> Ordering {
        a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id))
    }
}

fn push_unique(ids: &mut Vec<String>, id: String) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// A single write inside a transaction.
///
/// The variant is identified by which key is present on the wire object.
/// Shapes outside the known set decode as [`Mutation::Unrecognized`] so a
/// new server-side mutation kind never breaks history replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    Create(DocumentBody),
    CreateIfNotExists(DocumentBody),
    CreateOrReplace(DocumentBody),
    CreateSquashed(Map<String, Value>),
    Delete(Selection),
    Patch(PatchBody),
    #[serde(untagged)]
    Unrecognized(Value),
}

/// Full document body carried by the create variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentBody {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Target of a delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    pub id: String,
}

/// Target of a patch plus its operations (`set`, `unset`, `inc`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchBody {
    pub id: String,
    #[serde(flatten)]
    pub operations: Map<String, Value>,
}

impl Mutation {
    /// Creates a `create` mutation with an otherwise empty body.
    pub fn create(id: impl Into<String>) -> Self {
        Mutation::Create(DocumentBody::new(id))
    }

    /// Creates a `createIfNotExists` mutation with an otherwise empty body.
    pub fn create_if_not_exists(id: impl Into<String>) -> Self {
        Mutation::CreateIfNotExists(DocumentBody::new(id))
    }

    /// Creates a `createOrReplace` mutation with an otherwise empty body.
    pub fn create_or_replace(id: impl Into<String>) -> Self {
        Mutation::CreateOrReplace(DocumentBody::new(id))
    }

    /// Creates a `delete` mutation.
    pub fn delete(id: impl Into<String>) -> Self {
        Mutation::Delete(Selection { id: id.into() })
    }

    /// Creates a `patch` mutation with no operations.
    pub fn patch(id: impl Into<String>) -> Self {
        Mutation::Patch(PatchBody {
            id: id.into(),
            operations: Map::new(),
        })
    }

    /// Returns the id of the document this mutation writes to.
    ///
    /// `createSquashed` and unrecognized shapes have no single target.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Mutation::Create(body)
            | Mutation::CreateIfNotExists(body)
            | Mutation::CreateOrReplace(body) => Some(&body.id),
            Mutation::Delete(selection) => Some(&selection.id),
            Mutation::Patch(patch) => Some(&patch.id),
            Mutation::CreateSquashed(_) | Mutation::Unrecognized(_) => None,
        }
    }

    /// Returns the wire key naming this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "create",
            Mutation::CreateIfNotExists(_) => "createIfNotExists",
            Mutation::CreateOrReplace(_) => "createOrReplace",
            Mutation::CreateSquashed(_) => "createSquashed",
            Mutation::Delete(_) => "delete",
            Mutation::Patch(_) => "patch",
            Mutation::Unrecognized(_) => "unrecognized",
        }
    }
}

impl DocumentBody {
    /// Creates a body holding only the document id.
    pub fn new(id: impl Into<String>) -> Self {
        DocumentBody {
            id: id.into(),
            fields: Map::new(),
        }
    }
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod tests;
