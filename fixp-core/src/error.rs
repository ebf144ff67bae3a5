/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Error types for the FIXP session engine.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across the message, session and transport layers.

use thiserror::Error;

/// Top-level error type for all FIXP operations.
#[derive(Debug, Error)]
pub enum FixpError {
    /// Error while decoding an inbound frame.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error while encoding an outbound document.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error in session layer operations.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Error in the underlying transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors that occur while decoding an inbound text frame into a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The frame is not valid JSON.
    #[error("invalid json: {0}")]
    InvalidJson(String),

    /// The frame is valid JSON but not an object.
    #[error("document is not a json object")]
    NotAnObject,

    /// A value could not be parsed from its textual form.
    #[error("cannot parse {what} from '{input}'")]
    Parse {
        /// What was being parsed.
        what: &'static str,
        /// The rejected input.
        input: String,
    },
}

/// Errors that occur while encoding an outbound document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Serialization into JSON failed.
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// The serialized value is not a JSON object.
    #[error("encoded message is not a json object")]
    NotAnObject,
}

/// Errors in FIXP session layer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Negotiation or establishment was rejected by the counterparty.
    #[error("establishment rejected: {reason}")]
    EstablishmentRejected {
        /// Reason supplied by the counterparty, or `unspecified`.
        reason: String,
    },

    /// Session configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The background worker could not be started.
    #[error("worker error: {0}")]
    Worker(String),
}

/// Errors raised by the transport adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint URL is not a valid WebSocket URL.
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),

    /// Connecting to the endpoint failed (refused, TLS, handshake).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connecting did not complete in time.
    #[error("connect timed out after {timeout_ms} milliseconds")]
    ConnectTimeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The connection is already closed.
    #[error("connection closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::Parse {
            what: "side",
            input: "X".to_string(),
        };
        assert_eq!(err.to_string(), "cannot parse side from 'X'");
    }

    #[test]
    fn test_fixp_error_from_decode() {
        let fixp_err: FixpError = DecodeError::NotAnObject.into();
        assert!(matches!(fixp_err, FixpError::Decode(DecodeError::NotAnObject)));
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::EstablishmentRejected {
            reason: "Credentials".to_string(),
        };
        assert_eq!(err.to_string(), "establishment rejected: Credentials");
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::ConnectTimeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "connect timed out after 5000 milliseconds");
    }
}
