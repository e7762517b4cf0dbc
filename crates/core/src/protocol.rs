// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between docsync clients and a document store.
//!
//! The protocol is small:
//! - Client asks for a one-shot query result, a transaction log, a
//!   historical document, or opens a listener
//! - Server answers with a result, an NDJSON body, or a stream of listener
//!   events (`welcome`, `mutation`, `reconnect`)

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::transaction::Mutation;

/// Named query parameters.
pub type Params = Map<String, Value>;

/// Kinds of events a listener can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenEventKind {
    Welcome,
    Mutation,
    Reconnect,
}

impl ListenEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListenEventKind::Welcome => "welcome",
            ListenEventKind::Mutation => "mutation",
            ListenEventKind::Reconnect => "reconnect",
        }
    }
}

impl fmt::Display for ListenEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which writes a listener is notified about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Notify once the write is visible to queries.
    #[default]
    Query,
    /// Notify as soon as the transaction commits.
    Transaction,
}

/// Options sent when opening a listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenOptions {
    pub events: Vec<ListenEventKind>,
    /// Embed the changed document in mutation events.
    pub include_result: bool,
    /// Embed the applied mutations in mutation events.
    pub include_mutations: bool,
    pub visibility: Visibility,
}

impl ListenOptions {
    /// Options for pure invalidation signals: all three event kinds, no
    /// embedded payloads.
    pub fn invalidation() -> Self {
        ListenOptions {
            events: vec![
                ListenEventKind::Welcome,
                ListenEventKind::Mutation,
                ListenEventKind::Reconnect,
            ],
            include_result: false,
            include_mutations: false,
            visibility: Visibility::Query,
        }
    }

    /// Options for replaying transactions: mutation events carry their
    /// mutation lists.
    pub fn transactions() -> Self {
        ListenOptions {
            include_mutations: true,
            ..ListenOptions::invalidation()
        }
    }
}

/// A realtime mutation notification.
///
/// Every field is optional on the wire; the normalizer decides which are
/// required for the event to be usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// User id of the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutations: Option<Vec<Mutation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// An event delivered on a listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListenEvent {
    /// The listener is live.
    Welcome,
    /// A write touched the listened documents.
    Mutation(MutationEvent),
    /// The transport dropped and re-established its connection.
    Reconnect,
}

impl ListenEvent {
    pub fn kind(&self) -> ListenEventKind {
        match self {
            ListenEvent::Welcome => ListenEventKind::Welcome,
            ListenEvent::Mutation(_) => ListenEventKind::Mutation,
            ListenEvent::Reconnect => ListenEventKind::Reconnect,
        }
    }
}

/// Point in a document's history to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySelector {
    Time(DateTime<Utc>),
    Revision(String),
}

impl HistorySelector {
    /// Builds a selector from optional parts.
    ///
    /// Time and revision are mutually exclusive; passing both fails with
    /// [`Error::ConflictingSelector`]. Passing neither means "latest".
    pub fn from_parts(
        time: Option<DateTime<Utc>>,
        revision: Option<String>,
    ) -> Result<Option<Self>> {
        match (time, revision) {
            (Some(_), Some(_)) => Err(Error::ConflictingSelector),
            (Some(time), None) => Ok(Some(HistorySelector::Time(time))),
            (None, Some(revision)) => Ok(Some(HistorySelector::Revision(revision))),
            (None, None) => Ok(None),
        }
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Run a query once.
    Fetch { query: String, params: Params },

    /// Open a listener for a query.
    Listen {
        query: String,
        params: Params,
        options: ListenOptions,
    },

    /// Request the transaction log for a set of documents.
    Transactions { document_ids: Vec<String> },

    /// Request documents as they were at a point in history.
    History {
        document_ids: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<HistorySelector>,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome,
    Mutation(MutationEvent),
    Reconnect,

    /// Response to a Fetch request.
    Result { result: Value },

    /// Response to a Transactions or History request.
    Ndjson { body: String },

    /// Error message.
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Fetch message.
    pub fn fetch(query: impl Into<String>, params: Params) -> Self {
        ClientMessage::Fetch {
            query: query.into(),
            params,
        }
    }

    /// Creates a Listen message.
    pub fn listen(query: impl Into<String>, params: Params, options: ListenOptions) -> Self {
        ClientMessage::Listen {
            query: query.into(),
            params,
            options,
        }
    }

    /// Creates a Transactions message.
    pub fn transactions(document_ids: Vec<String>) -> Self {
        ClientMessage::Transactions { document_ids }
    }

    /// Creates a History message.
    pub fn history(document_ids: Vec<String>, selector: Option<HistorySelector>) -> Self {
        ClientMessage::History {
            document_ids,
            selector,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates a Result message.
    pub fn result(result: Value) -> Self {
        ServerMessage::Result { result }
    }

    /// Creates an Ndjson message.
    pub fn ndjson(body: impl Into<String>) -> Self {
        ServerMessage::Ndjson { body: body.into() }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Returns the listener event this message carries, if any.
    pub fn into_listen_event(self) -> Option<ListenEvent> {
        match self {
            ServerMessage::Welcome => Some(ListenEvent::Welcome),
            ServerMessage::Mutation(event) => Some(ListenEvent::Mutation(event)),
            ServerMessage::Reconnect => Some(ListenEvent::Reconnect),
            ServerMessage::Result { .. }
            | ServerMessage::Ndjson { .. }
            | ServerMessage::Error { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
