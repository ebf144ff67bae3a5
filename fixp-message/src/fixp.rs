/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! FIXP session-layer messages.
//!
//! Every session-layer document starts from its `MessageType`. All but
//! `UnsequencedHeartbeat` are then decorated with the `SessionId` and a numeric
//! `Timestamp`. The timestamp is integer nanoseconds since the Unix epoch
//! unless [`TimestampUnit::Seconds`] is selected, which sends the fractional
//! epoch seconds that Python FIXP gateways emit.

use crate::encoder::WireMessage;
use fixp_core::document::MessageKind;
use fixp_core::error::DecodeError;
use fixp_core::types::{SessionId, Timestamp};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Client message flow advertised in `Negotiate`.
pub const CLIENT_FLOW_UNSEQUENCED: &str = "Unsequenced";

/// Credentials type advertised in `Negotiate`.
pub const CREDENTIALS_TYPE_LOGIN: &str = "login";

/// Default multiplier from heartbeat seconds to the advertised `KeepaliveInterval`.
///
/// The counterparty expects `seconds * 10000`, which is not a standard unit
/// conversion; keep it configurable until the wire contract is confirmed.
pub const DEFAULT_KEEPALIVE_SCALE: u64 = 10_000;

/// Unit of the numeric `Timestamp` on decorated session messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimestampUnit {
    /// Integer nanoseconds since the Unix epoch.
    #[default]
    Nanoseconds,
    /// Fractional seconds since the Unix epoch.
    Seconds,
}

impl TimestampUnit {
    /// Returns the command line spelling of this unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nanoseconds => "nanos",
            Self::Seconds => "secs",
        }
    }
}

impl fmt::Display for TimestampUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampUnit {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nanos" | "ns" | "nanoseconds" => Ok(Self::Nanoseconds),
            "secs" | "s" | "seconds" => Ok(Self::Seconds),
            _ => Err(DecodeError::Parse {
                what: "timestamp unit",
                input: s.to_string(),
            }),
        }
    }
}

/// A `Timestamp` paired with the unit it is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireTimestamp {
    /// Creation time of the message.
    pub instant: Timestamp,
    /// Unit written on the wire.
    pub unit: TimestampUnit,
}

impl WireTimestamp {
    /// Returns the current time in the given unit.
    #[must_use]
    pub fn now(unit: TimestampUnit) -> Self {
        Self {
            instant: Timestamp::now(),
            unit,
        }
    }
}

impl Serialize for WireTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.unit {
            TimestampUnit::Nanoseconds => serializer.serialize_u64(self.instant.as_nanos()),
            TimestampUnit::Seconds => serializer.serialize_f64(self.instant.as_secs_f64()),
        }
    }
}

/// Type, session and timestamp fields shared by decorated session messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FixpHeader {
    /// Message type discriminator.
    pub message_type: MessageKind,
    /// Session the message belongs to.
    pub session_id: SessionId,
    /// Creation time of the message.
    pub timestamp: WireTimestamp,
}

impl FixpHeader {
    /// Decorates a message type with the session id and the current time.
    ///
    /// # Arguments
    /// * `message_type` - Message type discriminator
    /// * `session_id` - Session the message belongs to
    /// * `unit` - Unit the timestamp is written in
    #[must_use]
    pub fn decorate(message_type: MessageKind, session_id: SessionId, unit: TimestampUnit) -> Self {
        Self {
            message_type,
            session_id,
            timestamp: WireTimestamp::now(unit),
        }
    }
}

/// Login credentials nested in `Negotiate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    /// Always `login`.
    pub credentials_type: &'static str,
    /// `<username>:<password>`.
    pub token: String,
}

/// Negotiate message, the first message of the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Negotiate {
    /// Type, session id and timestamp.
    #[serde(flatten)]
    pub header: FixpHeader,
    /// Client message flow.
    pub client_flow: &'static str,
    /// Login credentials.
    pub credentials: Credentials,
}

impl WireMessage for Negotiate {
    fn kind(&self) -> MessageKind {
        MessageKind::Negotiate
    }
}

/// Establish message, sent once negotiation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Establish {
    /// Type, session id and timestamp.
    #[serde(flatten)]
    pub header: FixpHeader,
    /// Advertised keepalive, derived from the heartbeat interval.
    pub keepalive_interval: u64,
}

impl WireMessage for Establish {
    fn kind(&self) -> MessageKind {
        MessageKind::Establish
    }
}

/// Heartbeat message carrying only its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnsequencedHeartbeat {
    /// Message type discriminator.
    pub message_type: MessageKind,
}

impl WireMessage for UnsequencedHeartbeat {
    fn kind(&self) -> MessageKind {
        MessageKind::UnsequencedHeartbeat
    }
}

/// Builds a `Negotiate` message.
///
/// # Arguments
/// * `session_id` - Identifier of the session being negotiated
/// * `user_name` - Login user name
/// * `password` - Login password
/// * `unit` - Unit of the `Timestamp` field
#[must_use]
pub fn negotiate(
    session_id: SessionId,
    user_name: &str,
    password: &str,
    unit: TimestampUnit,
) -> Negotiate {
    Negotiate {
        header: FixpHeader::decorate(MessageKind::Negotiate, session_id, unit),
        client_flow: CLIENT_FLOW_UNSEQUENCED,
        credentials: Credentials {
            credentials_type: CREDENTIALS_TYPE_LOGIN,
            token: format!("{user_name}:{password}"),
        },
    }
}

/// Computes the advertised `KeepaliveInterval` for a heartbeat interval.
///
/// # Arguments
/// * `heartbeat_interval_secs` - Local heartbeat interval in seconds
/// * `scale` - Multiplier applied to the interval
#[inline]
#[must_use]
pub const fn keepalive_interval(heartbeat_interval_secs: u64, scale: u64) -> u64 {
    heartbeat_interval_secs.saturating_mul(scale)
}

/// Builds an `Establish` message.
///
/// # Arguments
/// * `session_id` - Identifier of the negotiated session
/// * `heartbeat_interval_secs` - Local heartbeat interval in seconds
/// * `keepalive_scale` - Multiplier giving the advertised keepalive
/// * `unit` - Unit of the `Timestamp` field
#[must_use]
pub fn establish(
    session_id: SessionId,
    heartbeat_interval_secs: u64,
    keepalive_scale: u64,
    unit: TimestampUnit,
) -> Establish {
    Establish {
        header: FixpHeader::decorate(MessageKind::Establish, session_id, unit),
        keepalive_interval: keepalive_interval(heartbeat_interval_secs, keepalive_scale),
    }
}

/// Builds an `UnsequencedHeartbeat` message.
#[must_use]
pub fn unsequenced_heartbeat() -> UnsequencedHeartbeat {
    UnsequencedHeartbeat {
        message_type: MessageKind::UnsequencedHeartbeat,
    }
}
