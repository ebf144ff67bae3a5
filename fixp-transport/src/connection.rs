/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! WebSocket connection.
//!
//! A connection owns two tasks: a reader that turns frames into
//! [`TransportEvent`]s and a writer that drains an outbound queue, so sends
//! leave in the order they were queued.

use crate::codec::{Decoded, Outbound, TransportEvent, decode_frame};
use fixp_core::error::TransportError;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Default bound on establishing the connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle for queueing outbound frames.
#[derive(Debug, Clone)]
pub struct WsSender {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl WsSender {
    /// Queues a text frame.
    ///
    /// # Errors
    /// Returns `TransportError::Closed` once the writer has stopped.
    pub fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.tx
            .send(Outbound::Text(text))
            .map_err(|_| TransportError::Closed)
    }

    /// Queues a close frame. Later sends are dropped by the writer.
    pub fn close(&self) {
        if self.tx.send(Outbound::Close).is_err() {
            debug!("Close requested on stopped writer");
        }
    }

    /// Returns true once the writer has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// An open WebSocket connection.
#[derive(Debug)]
pub struct WsConnection {
    url: String,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    sender: WsSender,
    cancel: CancellationToken,
}

impl WsConnection {
    /// Returns the endpoint this connection was opened to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns a handle for queueing outbound frames.
    #[must_use]
    pub fn sender(&self) -> WsSender {
        self.sender.clone()
    }

    /// Waits for the next transport event.
    ///
    /// Returns `None` after the reader stopped and every event was consumed.
    /// Cancel safe.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Checks that `url` names a WebSocket endpoint.
///
/// # Errors
/// Returns `TransportError::InvalidUrl` unless the scheme is `ws` or `wss`
/// and a host follows it.
pub fn validate_url(url: &str) -> Result<(), TransportError> {
    let rest = url
        .strip_prefix("wss://")
        .or_else(|| url.strip_prefix("ws://"))
        .ok_or_else(|| TransportError::InvalidUrl(url.to_string()))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(TransportError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

/// Opens a WebSocket connection.
///
/// The first event of the returned connection is always
/// [`TransportEvent::Open`].
///
/// # Arguments
/// * `url` - `ws://` or `wss://` endpoint
/// * `timeout` - Bound on the TCP, TLS and WebSocket handshakes
///
/// # Errors
/// Returns `InvalidUrl`, `ConnectTimeout` or `ConnectionFailed`.
pub async fn connect(url: &str, timeout: Duration) -> Result<WsConnection, TransportError> {
    validate_url(url)?;
    info!(url, "Connecting");

    let (stream, response) = tokio::time::timeout(timeout, connect_async(url))
        .await
        .map_err(|_| TransportError::ConnectTimeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })?
        .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
    info!(url, status = %response.status(), "Connected");

    let (write, read) = stream.split();
    let (event_tx, events) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    // The receiver is held below, so this cannot fail.
    let _ = event_tx.send(TransportEvent::Open);

    tokio::spawn(write_loop(write, out_rx, cancel.clone()));
    tokio::spawn(read_loop(read, event_tx, out_tx.clone(), cancel.clone()));

    Ok(WsConnection {
        url: url.to_string(),
        events,
        sender: WsSender { tx: out_tx },
        cancel,
    })
}

async fn read_loop(
    mut read: SplitStream<WsStream>,
    events: mpsc::UnboundedSender<TransportEvent>,
    outbound: mpsc::UnboundedSender<Outbound>,
    cancel: CancellationToken,
) {
    let reason = loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!("Reader cancelled");
                return;
            }
            frame = read.next() => match frame {
                Some(Ok(message)) => match decode_frame(message) {
                    Decoded::Event(TransportEvent::Closed(reason)) => break reason,
                    Decoded::Event(event) => {
                        if events.send(event).is_err() {
                            return;
                        }
                    }
                    Decoded::Ping(data) => {
                        let _ = outbound.send(Outbound::Pong(data));
                    }
                    Decoded::Skip => {}
                },
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket read error");
                    break e.to_string();
                }
                None => break "stream ended".to_string(),
            },
        }
    };
    let _ = events.send(TransportEvent::Closed(reason));
}

async fn write_loop(
    mut write: SplitSink<WsStream, Message>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => break,
            next = outbound.recv() => next,
        };
        let Some(request) = next else {
            break;
        };
        let closing = request == Outbound::Close;
        if let Err(e) = write.send(request.into_message()).await {
            warn!(error = %e, "WebSocket write failed");
            break;
        }
        if closing {
            debug!("Close frame sent");
            break;
        }
    }
    outbound.close();
}
