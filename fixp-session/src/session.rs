/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! FIXP session state machine.
//!
//! A [`Session`] consumes transport events, inbound documents and timer
//! firings, and answers through a [`SessionIo`]. It owns the session id,
//! the client order id counter and the background worker, and is driven
//! from a single thread.

use crate::config::SessionConfig;
use crate::heartbeat::HeartbeatManager;
use crate::io::{SessionIo, TimerKind};
use crate::runner::Worker;
use crate::sequence::ClOrdIdGenerator;
use crate::state::SessionState;
use fixp_core::document::{Discriminator, Document, MessageKind};
use fixp_core::error::SessionError;
use fixp_core::types::SessionId;
use fixp_message::application::new_order_single;
use fixp_message::encoder::WireMessage;
use fixp_message::fixp::{establish, negotiate, unsequenced_heartbeat};
use std::fmt;
use tracing::{debug, error, info, warn};

/// A single FIXP client session.
pub struct Session {
    id: SessionId,
    state: SessionState,
    config: SessionConfig,
    heartbeat: HeartbeatManager,
    cl_ord_ids: ClOrdIdGenerator,
    shutdown_scheduled: bool,
    rejection: Option<SessionError>,
    worker: Option<Box<dyn Worker>>,
}

impl Session {
    /// Creates a session in `Connecting` with a fresh session id.
    ///
    /// # Arguments
    /// * `config` - Session configuration
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_id(SessionId::generate(), config)
    }

    /// Creates a session in `Connecting` with the given session id.
    #[must_use]
    pub fn with_id(id: SessionId, config: SessionConfig) -> Self {
        Self {
            id,
            state: SessionState::Connecting,
            heartbeat: HeartbeatManager::new(config.heartbeat_interval),
            config,
            cl_ord_ids: ClOrdIdGenerator::new(),
            shutdown_scheduled: false,
            rejection: None,
            worker: None,
        }
    }

    /// Hands background work to the session; it is stopped on shutdown.
    pub fn attach_worker(&mut self, worker: Box<dyn Worker>) {
        self.worker = Some(worker);
    }

    /// Returns the session id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the number of orders submitted so far.
    #[must_use]
    pub const fn orders_submitted(&self) -> u64 {
        self.cl_ord_ids.allocated()
    }

    /// Returns true once a delayed shutdown has been scheduled.
    #[must_use]
    pub const fn is_shutdown_scheduled(&self) -> bool {
        self.shutdown_scheduled
    }

    /// Returns why the counterparty refused the session, if it did.
    #[must_use]
    pub const fn rejection(&self) -> Option<&SessionError> {
        self.rejection.as_ref()
    }

    /// Returns true while a background worker is attached.
    #[must_use]
    pub const fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// Handles the transport opening by starting negotiation.
    pub fn on_open(&mut self, io: &mut dyn SessionIo) {
        if self.state != SessionState::Connecting {
            debug!(session_id = %self.id, state = %self.state, "Ignoring open");
            return;
        }
        info!(session_id = %self.id, "Transport open, negotiating");
        let message = negotiate(
            self.id,
            &self.config.user_name,
            &self.config.password,
            self.config.timestamp_unit,
        );
        self.send(&message, io);
        self.transition(SessionState::Negotiating);
    }

    /// Handles one inbound text frame.
    ///
    /// Malformed frames are logged and dropped. Returns the resolved message
    /// type of a well-formed document.
    pub fn on_text(&mut self, text: &str, io: &mut dyn SessionIo) -> Option<Discriminator> {
        debug!(session_id = %self.id, frame = %text, "Received");
        match Document::from_json(text) {
            Ok(document) => self.on_document(&document, io),
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Dropping malformed frame");
                None
            }
        }
    }

    /// Handles one inbound document.
    ///
    /// Returns the resolved message type, or `None` when the document has
    /// neither `MessageType` nor `MsgType`.
    pub fn on_document(
        &mut self,
        document: &Document,
        io: &mut dyn SessionIo,
    ) -> Option<Discriminator> {
        let Some(discriminator) = document.discriminator() else {
            debug!(session_id = %self.id, "Ignoring document without message type");
            return None;
        };

        match (self.state, &discriminator.kind) {
            (SessionState::Negotiating, MessageKind::NegotiationResponse) => {
                let message = establish(
                    self.id,
                    self.config.heartbeat_interval.as_secs(),
                    self.config.keepalive_scale.get(),
                    self.config.timestamp_unit,
                );
                self.send(&message, io);
            }
            (SessionState::Negotiating, MessageKind::EstablishmentAck) => {
                self.transition(SessionState::Established);
                if let Some(delay) = self.heartbeat.arm() {
                    io.schedule(delay, TimerKind::Heartbeat);
                }
                self.submit_order(io);
            }
            (
                SessionState::Negotiating,
                MessageKind::EstablishmentReject | MessageKind::NegotiationReject,
            ) => {
                let reason = document.get_str("Reason").unwrap_or("unspecified");
                warn!(
                    session_id = %self.id,
                    kind = %discriminator.kind,
                    reason,
                    "Session rejected, stopping"
                );
                self.rejection = Some(SessionError::EstablishmentRejected {
                    reason: reason.to_string(),
                });
                self.shutdown(io);
            }
            (SessionState::Negotiating | SessionState::Established, MessageKind::Terminate) => {
                info!(session_id = %self.id, "Counterparty terminated the session");
                self.shutdown(io);
            }
            (
                SessionState::Negotiating | SessionState::Established,
                MessageKind::UnsequencedHeartbeat,
            ) => {
                self.send(&unsequenced_heartbeat(), io);
            }
            (SessionState::Established, MessageKind::ExecutionReport) => {
                info!(
                    session_id = %self.id,
                    cl_ord_id = document.get_str("ClOrdID").unwrap_or_default(),
                    "Execution report received"
                );
                if !self.shutdown_scheduled {
                    self.shutdown_scheduled = true;
                    io.schedule(self.config.shutdown_delay, TimerKind::Shutdown);
                }
            }
            (state, kind) => {
                debug!(session_id = %self.id, state = %state, kind = %kind, "Ignoring message");
            }
        }

        Some(discriminator)
    }

    /// Handles a timer previously scheduled through [`SessionIo::schedule`].
    pub fn on_timer(&mut self, timer: TimerKind, io: &mut dyn SessionIo) {
        match timer {
            TimerKind::Heartbeat => {
                self.heartbeat.on_fired();
                if self.state != SessionState::Established {
                    debug!(session_id = %self.id, state = %self.state, "Stale heartbeat timer");
                    return;
                }
                self.send(&unsequenced_heartbeat(), io);
                if let Some(delay) = self.heartbeat.arm() {
                    io.schedule(delay, TimerKind::Heartbeat);
                }
            }
            TimerKind::Shutdown => {
                if self.state.is_terminating() {
                    debug!(session_id = %self.id, state = %self.state, "Stale shutdown timer");
                    return;
                }
                info!(session_id = %self.id, "Shutdown delay elapsed");
                self.shutdown(io);
            }
        }
    }

    /// Handles the transport closing.
    pub fn on_close(&mut self, reason: &str) {
        if self.state == SessionState::Closed {
            debug!(session_id = %self.id, reason, "Transport closed after shutdown");
            return;
        }
        info!(session_id = %self.id, reason, "Transport closed");
        self.heartbeat.disarm();
        self.stop_worker();
        self.transition(SessionState::Closed);
    }

    /// Runs the shutdown sequence.
    ///
    /// Stops the background worker with a bounded wait, then closes the
    /// transport. Returns false, doing nothing, if shutdown already ran or the
    /// transport is closed.
    pub fn shutdown(&mut self, io: &mut dyn SessionIo) -> bool {
        if self.state.is_terminating() {
            debug!(session_id = %self.id, state = %self.state, "Shutdown already done");
            return false;
        }
        self.transition(SessionState::ShuttingDown);
        self.heartbeat.disarm();
        self.stop_worker();
        io.close();
        self.transition(SessionState::Closed);
        true
    }

    fn stop_worker(&mut self) {
        let Some(mut worker) = self.worker.take() else {
            return;
        };
        worker.request_stop();
        let timeout = self.config.worker_join_timeout;
        if worker.join_timeout(timeout) {
            debug!(session_id = %self.id, "Background task joined");
        } else {
            warn!(
                session_id = %self.id,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "Background task did not stop in time"
            );
        }
    }

    fn submit_order(&mut self, io: &mut dyn SessionIo) {
        let cl_ord_id = self.cl_ord_ids.next_id();
        info!(session_id = %self.id, cl_ord_id = %cl_ord_id, "Submitting order");
        let order = new_order_single(&self.config.order, cl_ord_id);
        self.send(&order, io);
    }

    fn send<M: WireMessage>(&self, message: &M, io: &mut dyn SessionIo) {
        match message.encode() {
            Ok(frame) => {
                debug!(session_id = %self.id, frame = %frame, "Sending");
                io.send(frame);
            }
            Err(e) => {
                error!(session_id = %self.id, kind = %message.kind(), error = %e, "Failed to encode");
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        if !self.state.can_transition_to(next) {
            debug!(session_id = %self.id, from = %self.state, to = %next, "Transition refused");
            return;
        }
        info!(session_id = %self.id, from = %self.state, to = %next, "Session state changed");
        self.state = next;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("orders_submitted", &self.cl_ord_ids.allocated())
            .field("shutdown_scheduled", &self.shutdown_scheduled)
            .field("rejection", &self.rejection)
            .field("has_worker", &self.worker.is_some())
            .finish_non_exhaustive()
    }
}
