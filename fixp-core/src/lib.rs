/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # FIXP Core
//!
//! Core types and error definitions for the FIXP-over-WebSocket session engine.
//!
//! This crate provides the fundamental building blocks used across all crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Documents**: `Document`, the ordered field mapping for one JSON message,
//!   and `MessageKind` discrimination
//! - **Core types**: `SessionId`, `Timestamp`, `Side`, `OrdType`, `TimeInForce`

pub mod document;
pub mod error;
pub mod types;

pub use document::{Discriminator, Document, Layer, MESSAGE_TYPE, MSG_TYPE, MessageKind};
pub use error::{DecodeError, EncodeError, FixpError, SessionError, TransportError};
pub use types::{OrdType, SessionId, Side, TimeInForce, Timestamp};
