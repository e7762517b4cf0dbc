// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live query results.
//!
//! A live query listens for invalidation events and refetches the query
//! whenever the listened documents change:
//! - The listener's first event must be `welcome`, which triggers the
//!   initial fetch
//! - `mutation` events trigger throttled refetches
//! - later `welcome` and `reconnect` events are ignored

use std::future::pending;
use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use docsync_core::{ListenEvent, ListenOptions, Params};

use super::stream::TaskStream;
use super::throttle::Throttle;
use super::transport::Transport;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};

/// Stream of query results, one per fetch.
pub type QueryStream = TaskStream<SyncResult<Value>>;

/// Subscribe to a query's results.
///
/// Yields one result after the listener is established and one per
/// throttled burst of mutations. The stream ends when the listener ends,
/// after delivering any trailing refetch, or after the first error.
pub fn sync_query<T>(
    transport: Arc<T>,
    query: impl Into<String>,
    params: Params,
    config: &SyncConfig,
) -> QueryStream
where
    T: Transport + ?Sized + 'static,
{
    let query = query.into();
    let throttle = Throttle::new(config.throttle());
    TaskStream::spawn(config.channel_capacity, move |tx| async move {
        let live = LiveQuery {
            transport: transport.as_ref(),
            query: &query,
            params: &params,
            tx: &tx,
        };
        if let Err(err) = live.run(throttle).await {
            let _ = tx.send(Err(err)).await;
        }
    })
}

struct LiveQuery<'a, T: ?Sized> {
    transport: &'a T,
    query: &'a str,
    params: &'a Params,
    tx: &'a mpsc::Sender<SyncResult<Value>>,
}

impl<T: Transport + ?Sized> LiveQuery<'_, T> {
    async fn run(&self, mut throttle: Throttle) -> SyncResult<()> {
        let mut events = self
            .transport
            .listen(self.query, self.params, &ListenOptions::invalidation())
            .await?;

        match events.next().await {
            Some(Ok(ListenEvent::Welcome)) => {}
            Some(Ok(ListenEvent::Reconnect)) | None => {
                return Err(SyncError::Connection(
                    "could not establish subscription".to_string(),
                ));
            }
            Some(Ok(other)) => {
                return Err(SyncError::Connection(format!(
                    "unexpected first event type: {}",
                    other.kind()
                )));
            }
            Some(Err(e)) => return Err(e.into()),
        }

        info!(query = self.query, "live query established");
        if !self.emit().await? {
            return Ok(());
        }

        loop {
            let deadline = throttle.deadline();
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(ListenEvent::Mutation(_))) => {
                        if throttle.hit(Instant::now()) && !self.emit().await? {
                            return Ok(());
                        }
                    }
                    Some(Ok(event)) => debug!(kind = %event.kind(), "ignoring listener event"),
                    Some(Err(e)) if e.is_decode() => {
                        warn!(err = %e, "dropping undecodable listener frame");
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                _ = until(deadline) => {
                    if throttle.expire(Instant::now()) && !self.emit().await? {
                        return Ok(());
                    }
                }
            }
        }

        debug!(query = self.query, "listener ended");
        if throttle.is_pending() {
            if let Some(deadline) = throttle.deadline() {
                sleep_until(deadline).await;
            }
            self.emit().await?;
        }
        Ok(())
    }

    /// Fetch and deliver one result. Returns false once the consumer is gone.
    async fn emit(&self) -> SyncResult<bool> {
        let result = self.transport.fetch(self.query, self.params).await?;
        Ok(self.tx.send(Ok(result)).await.is_ok())
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
