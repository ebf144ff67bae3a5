/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Application callback interface.
//!
//! This module defines the callbacks the engine invokes as a session moves
//! through its lifecycle and business documents arrive.

use async_trait::async_trait;
use fixp_core::document::Document;
use fixp_core::types::SessionId;
use tracing::info;

/// Application callback interface for session events.
///
/// Implement this trait to observe a session and the application documents
/// it receives.
#[async_trait]
pub trait Application: Send + Sync {
    /// Called once the transport is up and the session object exists.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    async fn on_create(&self, session_id: SessionId);

    /// Called when the counterparty acknowledged establishment.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    async fn on_established(&self, session_id: SessionId);

    /// Called for every inbound application-layer document, such as
    /// execution reports.
    ///
    /// # Arguments
    /// * `document` - The received document
    /// * `session_id` - The session identifier
    #[allow(clippy::wrong_self_convention)]
    async fn from_app(&self, document: &Document, session_id: SessionId);

    /// Called after the transport closed.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    /// * `reason` - Close reason reported by the transport
    async fn on_close(&self, session_id: SessionId, reason: &str);
}

/// Default application that logs every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingApplication;

#[async_trait]
impl Application for LoggingApplication {
    async fn on_create(&self, session_id: SessionId) {
        info!(%session_id, "Session created");
    }

    async fn on_established(&self, session_id: SessionId) {
        info!(%session_id, "Session established");
    }

    async fn from_app(&self, document: &Document, session_id: SessionId) {
        info!(
            %session_id,
            kind = %document.kind().map(|k| k.to_string()).unwrap_or_default(),
            document = %document,
            "Application message"
        );
    }

    async fn on_close(&self, session_id: SessionId, reason: &str) {
        info!(%session_id, reason, "Session closed");
    }
}
