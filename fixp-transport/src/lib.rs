/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # FIXP Transport
//!
//! WebSocket transport for FIXP documents.
//!
//! This crate provides:
//! - **Connector**: `ws://` and `wss://` connections with a bounded handshake
//! - **Codec**: Mapping between WebSocket frames and transport events
//! - **Ordered writer**: A single queue feeding the socket

pub mod codec;
pub mod connection;

pub use codec::{Outbound, TransportEvent};
pub use connection::{DEFAULT_CONNECT_TIMEOUT, WsConnection, WsSender, connect, validate_url};
