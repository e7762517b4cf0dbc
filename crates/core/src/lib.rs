// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! docsync-core: Transaction log model and history replay.
//!
//! This crate provides the data structures and pure transformations shared
//! by the docsync client: decoding transaction logs, folding historical and
//! realtime transactions into one map, classifying transactions into
//! history events, and coalescing bursts of edits. Nothing here performs
//! I/O beyond reading a saved log file.

pub mod classify;
pub mod coalesce;
pub mod compile;
pub mod draft;
pub mod error;
pub mod event;
pub mod history;
pub mod ndjson;
pub mod normalize;
pub mod protocol;
pub mod transaction;

pub use classify::{classify, event_type};
pub use coalesce::{coalesce, coalesce_within, EDIT_COALESCE_THRESHOLD_SECS};
pub use compile::{chronological, Merge, TransactionCompiler, TransactionMap};
pub use error::{Error, Result};
pub use event::{find_event_for_rev, EventType, HistoryEvent};
pub use history::history_events;
pub use protocol::{
    ClientMessage, HistorySelector, ListenEvent, ListenEventKind, ListenOptions, MutationEvent,
    Params, ServerMessage, Visibility,
};
pub use transaction::{Mutation, Transaction, TransactionId};
