/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # FIXP Engine
//!
//! Client engine driving a FIXP session over WebSocket.
//!
//! This crate provides:
//! - **Initiator**: Single-task reactor connecting and driving one session
//! - **Timers**: One-shot heartbeat and shutdown timers
//! - **Application trait**: Callback interface for session events
//! - **Builder API**: Fluent configuration for engine setup

pub mod application;
pub mod builder;
pub mod initiator;
pub mod timer;

pub use application::{Application, LoggingApplication};
pub use builder::{DEFAULT_URL, EngineBuilder};
pub use initiator::{Initiator, ReactorIo};
pub use timer::TimerService;
