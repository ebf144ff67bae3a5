/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # FIXP Message
//!
//! Construction of the JSON documents exchanged over a FIXP session.
//!
//! This crate provides two families of builders:
//! - **Session layer** ([`fixp`]): `Negotiate`, `Establish` and
//!   `UnsequencedHeartbeat`, typed by `MessageType`
//! - **Application layer** ([`application`]): `NewOrderSingle`, typed by `MsgType`
//!
//! Builders are pure: they return a fresh message per call and only read the
//! clock for timestamp fields. Every message serializes with its fields in
//! declaration order.

pub mod application;
pub mod encoder;
pub mod fixp;

pub use application::{NewOrderSingle, OrderParams, new_order_single};
pub use encoder::WireMessage;
pub use fixp::{
    Establish, Negotiate, TimestampUnit, UnsequencedHeartbeat, WireTimestamp, establish, negotiate,
    unsequenced_heartbeat,
};
