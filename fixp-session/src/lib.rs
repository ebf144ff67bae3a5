/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # FIXP Session
//!
//! FIXP session layer for the order client.
//!
//! This crate provides:
//! - **State machine**: Runtime session FSM driven by inbound documents
//! - **Order ids**: Per-session client order id allocation
//! - **Heartbeat handling**: Heartbeat interval and keepalive derivation
//! - **Background work**: Periodic task runner with a bounded join
//! - **I/O seam**: Effects issued through a trait, recorded in tests
//! - **Configuration**: Session configuration options

pub mod config;
pub mod heartbeat;
pub mod io;
pub mod runner;
pub mod sequence;
pub mod session;
pub mod state;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use heartbeat::{HeartbeatInterval, HeartbeatManager};
pub use io::{Command, Outbox, SessionIo, TimerKind};
pub use runner::{TaskRunner, Worker};
pub use sequence::ClOrdIdGenerator;
pub use session::Session;
pub use state::SessionState;
