/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Core types for FIXP session operations.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`SessionId`]: Time-ordered session identifier
//! - [`Timestamp`]: Wall-clock timestamp with nanosecond precision
//! - [`Side`], [`OrdType`], [`TimeInForce`]: Order enumerations

use crate::error::DecodeError;
use arrayvec::ArrayString;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// FIXP session identifier.
///
/// Generated once per connection attempt as a UUIDv7, so identifiers of
/// successive sessions sort in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh identifier from the current time.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an existing UUID.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|_| DecodeError::Parse {
            what: "session id",
            input: s.to_string(),
        })
    }
}

/// Wall-clock timestamp with nanosecond precision.
///
/// Serializes as the number of nanoseconds since the Unix epoch, which is the
/// representation FIXP uses for its `Timestamp` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp {
    /// Nanoseconds since Unix epoch (1970-01-01 00:00:00 UTC).
    nanos_since_epoch: u64,
}

impl Timestamp {
    /// Creates a timestamp from nanoseconds since Unix epoch.
    ///
    /// # Arguments
    /// * `nanos` - Nanoseconds since 1970-01-01 00:00:00 UTC
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self {
            nanos_since_epoch: nanos,
        }
    }

    /// Creates a timestamp from milliseconds since Unix epoch.
    ///
    /// # Arguments
    /// * `millis` - Milliseconds since 1970-01-01 00:00:00 UTC
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos_since_epoch: millis * 1_000_000,
        }
    }

    /// Returns the current UTC timestamp.
    ///
    /// Saturates once the clock passes the last representable instant in 2262.
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        Self::try_from(Utc::now()).unwrap_or(Self::from_nanos(u64::MAX))
    }

    /// Returns nanoseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.nanos_since_epoch
    }

    /// Returns milliseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.nanos_since_epoch / 1_000_000
    }

    /// Returns fractional seconds since Unix epoch.
    #[inline]
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        Duration::from_nanos(self.nanos_since_epoch).as_secs_f64()
    }

    /// Returns microseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.nanos_since_epoch / 1_000
    }

    /// Converts to a chrono `DateTime<Utc>`.
    #[must_use]
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.nanos_since_epoch as i64)
    }

    /// Formats the timestamp in FIX format with millisecond precision.
    ///
    /// Format: `YYYYMMDD-HH:MM:SS.sss`
    #[must_use]
    pub fn format_millis(self) -> ArrayString<21> {
        let dt = self.to_datetime();
        let mut buf = ArrayString::new();
        let _ = std::fmt::write(
            &mut buf,
            format_args!("{}", dt.format("%Y%m%d-%H:%M:%S%.3f")),
        );
        buf
    }

    /// Formats the timestamp as ISO-8601 with millisecond precision.
    ///
    /// Format: `YYYY-MM-DDTHH:MM:SS.sss`
    #[must_use]
    pub fn format_iso(self) -> ArrayString<23> {
        let dt = self.to_datetime();
        let mut buf = ArrayString::new();
        let _ = std::fmt::write(
            &mut buf,
            format_args!("{}", dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
        );
        buf
    }

    /// Formats the timestamp as fractional seconds since the epoch.
    ///
    /// Format: `SSSSSSSSSS.uuuuuu`
    #[must_use]
    pub fn format_epoch_secs(self) -> String {
        format!(
            "{}.{:06}",
            self.nanos_since_epoch / 1_000_000_000,
            (self.nanos_since_epoch % 1_000_000_000) / 1_000
        )
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = DecodeError;

    /// Fails for instants before 1970 or after 2262-04-11.
    fn try_from(dt: DateTime<Utc>) -> Result<Self, Self::Error> {
        dt.timestamp_nanos_opt()
            .and_then(|nanos| u64::try_from(nanos).ok())
            .map(Self::from_nanos)
            .ok_or_else(|| DecodeError::Parse {
                what: "timestamp",
                input: dt.to_rfc3339(),
            })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_millis())
    }
}

impl FromStr for Timestamp {
    type Err = DecodeError;

    /// Parses RFC 3339 (`2019-08-02T17:00:00Z`) or FIX UTC format
    /// (`20190802-17:00:00.000`). Instants outside 1970..=2262 are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(_) => NaiveDateTime::parse_from_str(s, "%Y%m%d-%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y%m%d-%H:%M:%S"))
                .ok()
                .map(|naive| naive.and_utc()),
        };
        parsed
            .and_then(|dt| Self::try_from(dt).ok())
            .ok_or_else(|| DecodeError::Parse {
                what: "timestamp",
                input: s.to_string(),
            })
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl Side {
    /// Returns the wire representation of this side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }

    /// Returns true if this is a buy-side order.
    #[must_use]
    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }

    /// Returns true if this is a sell-side order.
    #[must_use]
    pub const fn is_sell(self) -> bool {
        matches!(self, Self::Sell)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" | "1" => Ok(Self::Buy),
            "sell" | "2" => Ok(Self::Sell),
            _ => Err(DecodeError::Parse {
                what: "side",
                input: s.to_string(),
            }),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrdType {
    /// Execute at the best available price.
    Market,
    /// Execute at the limit price or better.
    Limit,
    /// Market order triggered at a stop price.
    Stop,
    /// Limit order triggered at a stop price.
    StopLimit,
}

impl OrdType {
    /// Returns the wire representation of this order type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Market => "Market",
            Self::Limit => "Limit",
            Self::Stop => "Stop",
            Self::StopLimit => "StopLimit",
        }
    }
}

impl fmt::Display for OrdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrdType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "market" | "1" => Ok(Self::Market),
            "limit" | "2" => Ok(Self::Limit),
            "stop" | "3" => Ok(Self::Stop),
            "stoplimit" | "4" => Ok(Self::StopLimit),
            _ => Err(DecodeError::Parse {
                what: "order type",
                input: s.to_string(),
            }),
        }
    }
}

/// Order time in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Valid for the trading day.
    Day,
    /// Valid until cancelled.
    GoodTillCancel,
    /// Fill what is possible immediately, cancel the rest.
    ImmediateOrCancel,
    /// Fill entirely immediately or cancel.
    FillOrKill,
    /// Valid until the order's expire time.
    GoodTillDate,
}

impl TimeInForce {
    /// Returns the wire representation of this time in force.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::GoodTillCancel => "GoodTillCancel",
            Self::ImmediateOrCancel => "ImmediateOrCancel",
            Self::FillOrKill => "FillOrKill",
            Self::GoodTillDate => "GoodTillDate",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInForce {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "0" => Ok(Self::Day),
            "goodtillcancel" | "1" => Ok(Self::GoodTillCancel),
            "immediateorcancel" | "3" => Ok(Self::ImmediateOrCancel),
            "fillorkill" | "4" => Ok(Self::FillOrKill),
            "goodtilldate" | "6" => Ok(Self::GoodTillDate),
            _ => Err(DecodeError::Parse {
                what: "time in force",
                input: s.to_string(),
            }),
        }
    }
}
