// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! docsync: realtime query results and document history.
//!
//! Keeps query results current by listening for invalidation signals and
//! refetching, and replays a document's transaction log into a timeline of
//! created, edited, published and unpublished events that stays live as
//! new transactions commit.
//!
//! Every subscription takes its [`Transport`](sync::Transport) explicitly
//! and yields a stream that ends on the first error. Dropping a stream
//! cancels its listener.

pub mod cli;
pub mod config;
pub mod error;
pub mod sync;

pub use config::{Config, HistoryConfig, SyncConfig};
pub use error::{ConfigError, Error, Result, SyncError, SyncResult};
pub use sync::{
    compile, fetch_revision, stream_history, sync_query, Transport, WebSocketTransport,
};
