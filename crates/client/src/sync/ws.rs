// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket transport.
//!
//! Each call opens its own connection. Request/response calls send one
//! message and read one reply; a listen call keeps its connection open and
//! maps incoming frames to listener events until the server closes it. A
//! frame that fails to decode is reported and skipped.

use futures_util::{stream, SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use docsync_core::{ClientMessage, HistorySelector, ListenEvent, ListenOptions, Params, ServerMessage};

use super::transport::{
    EventStream, Transport, TransportError, TransportFuture, TransportResult,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport speaking the docsync protocol over WebSocket.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    url: String,
}

impl WebSocketTransport {
    /// Create a transport for a server URL (`ws://` or `wss://`).
    pub fn new(url: impl Into<String>) -> Self {
        WebSocketTransport { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn connect(&self) -> TransportResult<WsStream> {
        let (ws, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(ws)
    }

    /// Open a connection and send one message on it.
    async fn open(&self, msg: ClientMessage) -> TransportResult<WsStream> {
        let mut ws = self.connect().await?;
        let json = msg
            .to_json()
            .map_err(|e| TransportError::SerializationError(e.to_string()))?;
        ws.send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(ws)
    }

    /// Send one message and wait for the reply.
    async fn request(&self, msg: ClientMessage) -> TransportResult<ServerMessage> {
        let mut ws = self.open(msg).await?;
        let reply = recv(&mut ws)
            .await?
            .ok_or(TransportError::ConnectionClosed)?;
        let _ = ws.close(None).await;

        match reply {
            ServerMessage::Error { message } => Err(TransportError::Server(message)),
            reply => Ok(reply),
        }
    }

    async fn request_ndjson(&self, msg: ClientMessage) -> TransportResult<Vec<u8>> {
        match self.request(msg).await? {
            ServerMessage::Ndjson { body } => Ok(body.into_bytes()),
            other => Err(unexpected(&other)),
        }
    }
}

impl Transport for WebSocketTransport {
    fn fetch(&self, query: &str, params: &Params) -> TransportFuture<'_, Value> {
        let msg = ClientMessage::fetch(query, params.clone());
        Box::pin(async move {
            match self.request(msg).await? {
                ServerMessage::Result { result } => Ok(result),
                other => Err(unexpected(&other)),
            }
        })
    }

    fn listen(
        &self,
        query: &str,
        params: &Params,
        options: &ListenOptions,
    ) -> TransportFuture<'_, EventStream> {
        let msg = ClientMessage::listen(query, params.clone(), options.clone());
        Box::pin(async move {
            let ws = self.open(msg).await?;
            let events = stream::unfold(Some(ws), |ws| async move {
                let mut ws = ws?;
                let event = match recv(&mut ws).await {
                    Ok(Some(msg)) => into_event(msg),
                    Ok(None) => return None,
                    Err(e) => Err(e),
                };
                // Only connection and server errors end the listener.
                let next = match &event {
                    Err(e) if !e.is_decode() => None,
                    _ => Some(ws),
                };
                Some((event, next))
            });
            Ok(Box::pin(events) as EventStream)
        })
    }

    fn fetch_transactions(&self, document_ids: &[String]) -> TransportFuture<'_, Vec<u8>> {
        let msg = ClientMessage::transactions(document_ids.to_vec());
        Box::pin(self.request_ndjson(msg))
    }

    fn fetch_history(
        &self,
        document_ids: &[String],
        selector: Option<&HistorySelector>,
    ) -> TransportFuture<'_, Vec<u8>> {
        let msg = ClientMessage::history(document_ids.to_vec(), selector.cloned());
        Box::pin(self.request_ndjson(msg))
    }
}

/// Read the next protocol message, skipping control frames.
///
/// Returns `None` once the server closes the connection.
async fn recv(ws: &mut WsStream) -> TransportResult<Option<ServerMessage>> {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                let msg = ServerMessage::from_json(&text)
                    .map_err(|e| TransportError::SerializationError(e.to_string()))?;
                return Ok(Some(msg));
            }
            Some(Ok(Message::Close(_))) | None => return Ok(None),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
        }
    }
}

fn into_event(msg: ServerMessage) -> TransportResult<ListenEvent> {
    match msg {
        ServerMessage::Error { message } => Err(TransportError::Server(message)),
        msg => {
            let description = describe(&msg);
            msg.into_listen_event().ok_or_else(|| {
                TransportError::SerializationError(format!(
                    "unexpected {description} message on listener"
                ))
            })
        }
    }
}

fn unexpected(msg: &ServerMessage) -> TransportError {
    TransportError::SerializationError(format!("unexpected {} reply", describe(msg)))
}

fn describe(msg: &ServerMessage) -> &'static str {
    match msg {
        ServerMessage::Welcome => "welcome",
        ServerMessage::Mutation(_) => "mutation",
        ServerMessage::Reconnect => "reconnect",
        ServerMessage::Result { .. } => "result",
        ServerMessage::Ndjson { .. } => "ndjson",
        ServerMessage::Error { .. } => "error",
    }
}
