// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Document history as a live stream.
//!
//! History is compiled from two sources racing each other: the stored
//! transaction log, fetched once, and a realtime listener that reports new
//! transactions as they commit. Every fold emits the unified map.

use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use docsync_core::draft::{id_pair, published_id};
use docsync_core::{
    history_events, ndjson, normalize, HistoryEvent, HistorySelector, ListenEvent, ListenOptions,
    Params, TransactionCompiler, TransactionMap,
};

use super::stream::TaskStream;
use super::transport::Transport;
use crate::config::{Config, SyncConfig};
use crate::error::{SyncError, SyncResult};

/// Query listening for transactions on a set of documents.
pub const TRANSACTIONS_QUERY: &str = "*[_id in $ids]";

/// Stream of compiled transaction maps.
pub type CompileStream = TaskStream<SyncResult<TransactionMap>>;

/// Stream of newest-first document histories.
pub type HistoryStream = TaskStream<SyncResult<Vec<HistoryEvent>>>;

/// Compile the transactions touching `document_ids`.
///
/// The listener is opened before the log is fetched so no commit falls
/// between the two. Malformed or undecodable realtime events are logged and
/// dropped; a listener connection failure, or a log that fails to fetch or
/// decode, ends the stream with that error.
/// The stream ends once the log has arrived and the listener has closed.
pub fn compile<T>(transport: Arc<T>, document_ids: Vec<String>, config: &SyncConfig) -> CompileStream
where
    T: Transport + ?Sized + 'static,
{
    TaskStream::spawn(config.channel_capacity, move |tx| async move {
        if let Err(err) = run_compile(transport.as_ref(), &document_ids, &tx).await {
            let _ = tx.send(Err(err)).await;
        }
    })
}

async fn run_compile<T>(
    transport: &T,
    document_ids: &[String],
    tx: &mpsc::Sender<SyncResult<TransactionMap>>,
) -> SyncResult<()>
where
    T: Transport + ?Sized,
{
    let mut params = Params::new();
    params.insert("ids".to_string(), json!(document_ids));
    let mut events = transport
        .listen(TRANSACTIONS_QUERY, &params, &ListenOptions::transactions())
        .await?;

    let history = async {
        let body = transport.fetch_transactions(document_ids).await?;
        let txs = normalize::from_ndjson(&body)?;
        Ok::<_, SyncError>(txs)
    };
    tokio::pin!(history);

    let mut compiler = TransactionCompiler::new();
    let mut history_done = false;
    let mut listening = true;

    while !history_done || listening {
        let unified = tokio::select! {
            txs = &mut history, if !history_done => {
                history_done = true;
                let txs = txs?;
                info!(count = txs.len(), "transaction log loaded");
                compiler.apply_history(txs)
            }
            event = events.next(), if listening => match event {
                Some(Ok(ListenEvent::Mutation(event))) => {
                    match normalize::from_mutation_event(&event, document_ids) {
                        Ok(transaction) => compiler.apply_realtime(transaction),
                        Err(err) => {
                            warn!(%err, "dropping realtime event");
                            continue;
                        }
                    }
                }
                Some(Ok(event)) => {
                    debug!(kind = %event.kind(), "ignoring listener event");
                    continue;
                }
                Some(Err(err)) if err.is_decode() => {
                    warn!(%err, "dropping undecodable realtime frame");
                    continue;
                }
                Some(Err(err)) => return Err(err.into()),
                None => {
                    listening = false;
                    continue;
                }
            },
        };

        if tx.send(Ok(unified.clone())).await.is_err() {
            break;
        }
    }

    Ok(())
}

/// Stream a document's history, newest first.
///
/// Each id is compiled together with its draft or published counterpart.
/// Events are reported under the published id of the first entry.
pub fn stream_history<T>(transport: Arc<T>, document_ids: &[String], config: &Config) -> HistoryStream
where
    T: Transport + ?Sized + 'static,
{
    let published = document_ids
        .first()
        .map(|id| published_id(id))
        .unwrap_or_default();
    let threshold = config.history.coalesce_threshold();
    let mut compiled = compile(transport, expand_ids(document_ids), &config.sync);

    TaskStream::spawn(config.sync.channel_capacity, move |tx| async move {
        while let Some(item) = compiled.next().await {
            let item = item.map(|map| history_events(&published, &map, threshold));
            if tx.send(item).await.is_err() {
                break;
            }
        }
    })
}

/// Pairs every id with its counterpart, keeping first-seen order.
fn expand_ids(document_ids: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in document_ids.iter().flat_map(|id| id_pair(id)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Fetch a document as it was at a point in its history.
///
/// `None` reads the latest revision. Returns every document the server
/// sent, usually one; empty when the document did not exist then.
pub async fn fetch_revision<T>(
    transport: &T,
    document_id: &str,
    selector: Option<&HistorySelector>,
) -> SyncResult<Vec<Value>>
where
    T: Transport + ?Sized,
{
    let body = transport
        .fetch_history(&[document_id.to_string()], selector)
        .await?;
    Ok(ndjson::parse(&body)?)
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
