// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use futures_util::stream;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};

use docsync_core::{
    HistorySelector, ListenEvent, ListenOptions, Mutation, MutationEvent, Params,
};

use super::transport::{EventStream, Transport, TransportError, TransportFuture, TransportResult};

type EventSender = mpsc::UnboundedSender<TransportResult<ListenEvent>>;
type BodySender = oneshot::Sender<TransportResult<Vec<u8>>>;

/// A listen call recorded by the mock.
#[derive(Debug, Clone)]
pub struct ListenCall {
    pub query: String,
    pub params: Params,
    pub options: ListenOptions,
}

/// Mock transport driven by channels.
///
/// Listener events are pushed through the sender returned by
/// [`MockTransport::new`]; dropping it ends the listener. The transaction
/// log resolves when the body sender fires.
pub struct MockTransport {
    events: Mutex<Option<mpsc::UnboundedReceiver<TransportResult<ListenEvent>>>>,
    transactions: Mutex<Option<oneshot::Receiver<TransportResult<Vec<u8>>>>>,
    revision_body: Vec<u8>,
    fetches: AtomicUsize,
    pub listens: Mutex<Vec<ListenCall>>,
    pub history_requests: Mutex<Vec<(Vec<String>, Option<HistorySelector>)>>,
}

/// Test-side ends of a [`MockTransport`].
pub struct MockHandle {
    pub events: EventSender,
    pub transactions: Option<BodySender>,
}

impl MockHandle {
    pub fn send(&self, event: ListenEvent) {
        self.events.send(Ok(event)).unwrap();
    }

    pub fn fail(&self, err: TransportError) {
        self.events.send(Err(err)).unwrap();
    }

    /// Resolve the transaction log request.
    pub fn resolve_transactions(&mut self, body: TransportResult<Vec<u8>>) {
        let _ = self.transactions.take().unwrap().send(body);
    }
}

impl MockTransport {
    pub fn new() -> (Self, MockHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (body_tx, body_rx) = oneshot::channel();
        let transport = MockTransport {
            events: Mutex::new(Some(events_rx)),
            transactions: Mutex::new(Some(body_rx)),
            revision_body: Vec::new(),
            fetches: AtomicUsize::new(0),
            listens: Mutex::new(Vec::new()),
            history_requests: Mutex::new(Vec::new()),
        };
        let handle = MockHandle {
            events: events_tx,
            transactions: Some(body_tx),
        };
        (transport, handle)
    }

    pub fn with_revision_body(mut self, body: &str) -> Self {
        self.revision_body = body.as_bytes().to_vec();
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    /// Each fetch returns `{"fetch": n}`, counting from 1.
    fn fetch(&self, _query: &str, _params: &Params) -> TransportFuture<'_, Value> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        Box::pin(async move { Ok(json!({ "fetch": n })) })
    }

    fn listen(
        &self,
        query: &str,
        params: &Params,
        options: &ListenOptions,
    ) -> TransportFuture<'_, EventStream> {
        self.listens.lock().unwrap().push(ListenCall {
            query: query.to_string(),
            params: params.clone(),
            options: options.clone(),
        });
        let rx = self.events.lock().unwrap().take();
        Box::pin(async move {
            let rx = rx.ok_or(TransportError::ConnectionClosed)?;
            let events = stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|event| (event, rx))
            });
            Ok(Box::pin(events) as EventStream)
        })
    }

    fn fetch_transactions(&self, _document_ids: &[String]) -> TransportFuture<'_, Vec<u8>> {
        let rx = self.transactions.lock().unwrap().take();
        Box::pin(async move {
            let rx = rx.ok_or(TransportError::ConnectionClosed)?;
            rx.await.map_err(|_| TransportError::ConnectionClosed)?
        })
    }

    fn fetch_history(
        &self,
        document_ids: &[String],
        selector: Option<&HistorySelector>,
    ) -> TransportFuture<'_, Vec<u8>> {
        self.history_requests
            .lock()
            .unwrap()
            .push((document_ids.to_vec(), selector.cloned()));
        let body = self.revision_body.clone();
        Box::pin(async move { Ok(body) })
    }
}

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap()
}

/// A realtime mutation event carrying a full transaction.
pub fn mutation_event(rev: &str, minute: u32, mutations: Vec<Mutation>) -> ListenEvent {
    ListenEvent::Mutation(MutationEvent {
        document_id: Some("post-1".to_string()),
        transaction_id: Some(rev.to_string()),
        identity: Some("user-a".to_string()),
        mutations: Some(mutations),
        timestamp: Some(at(minute)),
    })
}

/// A bare invalidation signal, as sent to live queries.
pub fn invalidation() -> ListenEvent {
    ListenEvent::Mutation(MutationEvent::default())
}
