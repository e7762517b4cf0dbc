// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction over the document store.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing
//!
//! Every live query and history subscription receives its transport
//! explicitly; nothing here is global.

use std::future::Future;
use std::pin::Pin;

use futures_util::Stream;
use serde_json::Value;

use docsync_core::{HistorySelector, ListenEvent, ListenOptions, Params};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// The server answered with an error.
    #[error("server error: {0}")]
    Server(String),
}

impl TransportError {
    /// Returns true if a single message failed to decode.
    ///
    /// The connection that carried it is still usable.
    pub fn is_decode(&self) -> bool {
        matches!(self, TransportError::SerializationError(_))
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by transport methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Stream of listener events.
///
/// Ends when the server closes the listener or the connection fails. A
/// frame that does not decode yields an error item and the stream goes on.
pub type EventStream = Pin<Box<dyn Stream<Item = TransportResult<ListenEvent>> + Send>>;

/// Primitives a document store exposes to docsync.
pub trait Transport: Send + Sync {
    /// Run a query once and return its result.
    fn fetch(&self, query: &str, params: &Params) -> TransportFuture<'_, Value>;

    /// Open a push subscription for a query.
    fn listen(
        &self,
        query: &str,
        params: &Params,
        options: &ListenOptions,
    ) -> TransportFuture<'_, EventStream>;

    /// Fetch the raw NDJSON transaction log for a set of documents.
    fn fetch_transactions(&self, document_ids: &[String]) -> TransportFuture<'_, Vec<u8>>;

    /// Fetch documents as NDJSON at a point in their history.
    ///
    /// `None` reads the latest revision.
    fn fetch_history(
        &self,
        document_ids: &[String],
        selector: Option<&HistorySelector>,
    ) -> TransportFuture<'_, Vec<u8>>;
}
