/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Engine builder for fluent configuration.
//!
//! This module provides a builder API for configuring the initiator.

use crate::application::{Application, LoggingApplication};
use crate::initiator::Initiator;
use fixp_core::error::{FixpError, SessionError};
use fixp_session::config::SessionConfig;
use fixp_session::runner::DEFAULT_TICK_PERIOD;
use fixp_transport::connection::{DEFAULT_CONNECT_TIMEOUT, validate_url};
use std::sync::Arc;
use std::time::Duration;

/// Endpoint used when none is configured.
pub const DEFAULT_URL: &str = "wss://demo-iguspretrade.ig.com/trade";

/// Builder for configuring a FIXP initiator.
#[derive(Debug)]
pub struct EngineBuilder<A: Application = LoggingApplication> {
    /// Application callback handler.
    application: Arc<A>,
    /// Session configuration.
    session: Option<SessionConfig>,
    /// WebSocket endpoint.
    url: String,
    /// Connection timeout.
    connect_timeout: Duration,
    /// Period of the background counter task.
    tick_period: Duration,
}

impl Default for EngineBuilder<LoggingApplication> {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder<LoggingApplication> {
    /// Creates a new engine builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            application: Arc::new(LoggingApplication),
            session: None,
            url: DEFAULT_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

impl<A: Application> EngineBuilder<A> {
    /// Sets the application callback handler.
    #[must_use]
    pub fn with_application<B: Application>(self, application: B) -> EngineBuilder<B> {
        EngineBuilder {
            application: Arc::new(application),
            session: self.session,
            url: self.url,
            connect_timeout: self.connect_timeout,
            tick_period: self.tick_period,
        }
    }

    /// Sets the session configuration.
    #[must_use]
    pub fn with_session(mut self, config: SessionConfig) -> Self {
        self.session = Some(config);
        self
    }

    /// Sets the WebSocket endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the period of the background counter task.
    #[must_use]
    pub const fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Returns the session configuration, if set.
    #[must_use]
    pub const fn session(&self) -> Option<&SessionConfig> {
        self.session.as_ref()
    }

    /// Returns the endpoint.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the connection timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the background tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Returns the application handler.
    #[must_use]
    pub fn application(&self) -> Arc<A> {
        Arc::clone(&self.application)
    }

    /// Builds the initiator.
    ///
    /// # Errors
    /// Returns an error if no session is configured, the endpoint is not a
    /// WebSocket URL, or the tick period is zero.
    pub fn build(self) -> Result<Initiator<A>, FixpError> {
        let session = self
            .session
            .ok_or_else(|| SessionError::Configuration("session configuration is required".into()))?;
        validate_url(&self.url)?;
        if self.tick_period.is_zero() {
            return Err(SessionError::Configuration("tick period must be positive".into()).into());
        }
        Ok(Initiator::new(
            self.url,
            self.connect_timeout,
            self.tick_period,
            session,
            self.application,
        ))
    }
}
