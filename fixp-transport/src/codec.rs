/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! WebSocket frame mapping.
//!
//! FIXP documents travel as UTF-8 text frames. This module maps raw
//! WebSocket frames to [`TransportEvent`]s and outbound requests to frames.

use std::fmt;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;

/// Close reason reported when the peer sent no close frame.
pub const NORMAL_CLOSE_REASON: &str = "normal close";

/// Event surfaced by the transport to the session driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is ready for traffic.
    Open,
    /// One decoded text frame.
    Text(String),
    /// A binary frame of the given size; not part of the protocol.
    Binary(usize),
    /// The connection ended.
    Closed(String),
}

impl fmt::Display for TransportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Text(text) => write!(f, "text({} bytes)", text.len()),
            Self::Binary(len) => write!(f, "binary({len} bytes)"),
            Self::Closed(reason) => write!(f, "closed({reason})"),
        }
    }
}

/// Request to the connection writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send a text frame.
    Text(String),
    /// Answer a ping.
    Pong(Vec<u8>),
    /// Send a close frame and stop writing.
    Close,
}

impl Outbound {
    /// Converts the request into the frame written to the socket.
    #[must_use]
    pub fn into_message(self) -> Message {
        match self {
            Self::Text(text) => Message::Text(text),
            Self::Pong(data) => Message::Pong(data),
            Self::Close => Message::Close(None),
        }
    }
}

/// Result of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Surface this event.
    Event(TransportEvent),
    /// Reply with a pong carrying this payload.
    Ping(Vec<u8>),
    /// Nothing to do.
    Skip,
}

/// Maps an inbound WebSocket frame.
#[must_use]
pub fn decode_frame(message: Message) -> Decoded {
    match message {
        Message::Text(text) => Decoded::Event(TransportEvent::Text(text)),
        Message::Binary(data) => Decoded::Event(TransportEvent::Binary(data.len())),
        Message::Ping(data) => Decoded::Ping(data),
        Message::Close(frame) => Decoded::Event(TransportEvent::Closed(close_reason(frame.as_ref()))),
        Message::Pong(_) | Message::Frame(_) => Decoded::Skip,
    }
}

/// Formats a close frame as a reason string.
#[must_use]
pub fn close_reason(frame: Option<&CloseFrame<'_>>) -> String {
    match frame {
        Some(frame) if frame.reason.is_empty() => u16::from(frame.code).to_string(),
        Some(frame) => format!("{} {}", u16::from(frame.code), frame.reason),
        None => NORMAL_CLOSE_REASON.to_string(),
    }
}
