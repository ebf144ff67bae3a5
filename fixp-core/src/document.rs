/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Document model for FIXP and application messages.
//!
//! This module provides:
//! - [`Document`]: Ordered field-name to value mapping, one per message
//! - [`MessageKind`]: Enumeration of the message types the engine knows about
//! - [`Discriminator`]: The kind of a document and the layer it belongs to
//!
//! Session-layer documents carry their type in `MessageType`, application
//! documents in `MsgType`.

use crate::error::{DecodeError, EncodeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field carrying the type of a session-layer document.
pub const MESSAGE_TYPE: &str = "MessageType";

/// Field carrying the type of an application-layer document.
pub const MSG_TYPE: &str = "MsgType";

/// Message types used by the FIXP handshake and the order flow.
///
/// Types the engine has no handling for are kept as `Other(String)`. On the
/// wire a kind is always a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    /// Negotiate - Session level, client to server.
    Negotiate,
    /// NegotiationResponse - Session level, server to client.
    NegotiationResponse,
    /// NegotiationReject - Session level, server to client.
    NegotiationReject,
    /// Establish - Session level, client to server.
    Establish,
    /// EstablishmentAck - Session level, server to client.
    EstablishmentAck,
    /// EstablishmentReject - Session level, server to client.
    EstablishmentReject,
    /// UnsequencedHeartbeat - Session level, both directions.
    UnsequencedHeartbeat,
    /// Terminate - Session level, both directions.
    Terminate,
    /// NewOrderSingle - Application level, client to server.
    NewOrderSingle,
    /// ExecutionReport - Application level, server to client.
    ExecutionReport,
    /// Any other message type.
    Other(String),
}

impl MessageKind {
    /// Returns the wire representation of this message kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Negotiate => "Negotiate",
            Self::NegotiationResponse => "NegotiationResponse",
            Self::NegotiationReject => "NegotiationReject",
            Self::Establish => "Establish",
            Self::EstablishmentAck => "EstablishmentAck",
            Self::EstablishmentReject => "EstablishmentReject",
            Self::UnsequencedHeartbeat => "UnsequencedHeartbeat",
            Self::Terminate => "Terminate",
            Self::NewOrderSingle => "NewOrderSingle",
            Self::ExecutionReport => "ExecutionReport",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Returns true if the engine has no handling for this kind.
    #[must_use]
    pub const fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl From<&str> for MessageKind {
    fn from(s: &str) -> Self {
        match s {
            "Negotiate" => Self::Negotiate,
            "NegotiationResponse" => Self::NegotiationResponse,
            "NegotiationReject" => Self::NegotiationReject,
            "Establish" => Self::Establish,
            "EstablishmentAck" => Self::EstablishmentAck,
            "EstablishmentReject" => Self::EstablishmentReject,
            "UnsequencedHeartbeat" => Self::UnsequencedHeartbeat,
            "Terminate" => Self::Terminate,
            "NewOrderSingle" => Self::NewOrderSingle,
            "ExecutionReport" => Self::ExecutionReport,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol layer a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// FIXP session-layer control message.
    Session,
    /// Business-layer application message.
    Application,
}

/// Resolved type of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
    /// Layer, taken from the field that carried the type.
    pub layer: Layer,
    /// Message kind.
    pub kind: MessageKind,
}

/// One protocol message as an ordered mapping of field names to values.
///
/// Field order is preserved from parsing or construction and is kept on
/// serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Parses a document from a decoded text frame.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidJson`] if the frame is not JSON and
    /// [`DecodeError::NotAnObject`] if it is not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
        Self::try_from(value)
    }

    /// Serializes any message into a document, keeping its field order.
    ///
    /// # Errors
    /// Returns an [`EncodeError`] if the message does not serialize to a JSON object.
    pub fn from_message<T: Serialize>(message: &T) -> Result<Self, EncodeError> {
        match serde_json::to_value(message) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(EncodeError::NotAnObject),
            Err(e) => Err(EncodeError::Serialize(e.to_string())),
        }
    }

    /// Returns the document as a compact JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    /// Resolves the message type.
    ///
    /// `MessageType` takes precedence over `MsgType`. Returns `None` when
    /// neither field is present as a string.
    #[must_use]
    pub fn discriminator(&self) -> Option<Discriminator> {
        if let Some(kind) = self.get_str(MESSAGE_TYPE) {
            return Some(Discriminator {
                layer: Layer::Session,
                kind: MessageKind::from(kind),
            });
        }
        self.get_str(MSG_TYPE).map(|kind| Discriminator {
            layer: Layer::Application,
            kind: MessageKind::from(kind),
        })
    }

    /// Returns the message kind, if the document carries one.
    #[must_use]
    pub fn kind(&self) -> Option<MessageKind> {
        self.discriminator().map(|d| d.kind)
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns a field value if it is a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Returns a field value if it is an unsigned integer.
    #[must_use]
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.0.get(field).and_then(Value::as_u64)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the field names in document order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for Document {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DecodeError::NotAnObject),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}
