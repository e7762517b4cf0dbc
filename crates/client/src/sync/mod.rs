// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live queries and document history over a document store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ sync_query  │────►│  Transport  │────►│  Document   │
//! │   compile   │◄────│   (trait)   │◄────│    Store    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ TaskStream  │  (one spawned task per subscription)
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - Invalidation-driven refetching with leading and trailing throttle
//! - History compiled from the stored log and realtime transactions
//! - Injectable transport trait for testing

mod history;
mod query;
mod stream;
mod throttle;
mod transport;
mod ws;

pub use history::{
    compile, fetch_revision, stream_history, CompileStream, HistoryStream, TRANSACTIONS_QUERY,
};
pub use query::{sync_query, QueryStream};
pub use stream::TaskStream;
pub use throttle::Throttle;
pub use transport::{
    EventStream, Transport, TransportError, TransportFuture, TransportResult,
};
pub use ws::WebSocketTransport;

#[cfg(test)]
mod test_helpers;
