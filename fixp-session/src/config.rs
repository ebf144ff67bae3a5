/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Session configuration.
//!
//! This module provides configuration options for FIXP sessions.

use crate::heartbeat::HeartbeatInterval;
use fixp_core::error::SessionError;
use fixp_message::application::OrderParams;
use fixp_message::fixp::{DEFAULT_KEEPALIVE_SCALE, TimestampUnit};
use std::num::NonZeroU64;
use std::time::Duration;

/// Delay between an execution report and the shutdown it triggers.
pub const DEFAULT_SHUTDOWN_DELAY: Duration = Duration::from_secs(10);

/// Bounded wait for the background worker during shutdown.
pub const DEFAULT_WORKER_JOIN_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration for a FIXP session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Login user name.
    pub user_name: String,
    /// Login password.
    pub password: String,
    /// Heartbeat interval.
    pub heartbeat_interval: HeartbeatInterval,
    /// Multiplier from heartbeat seconds to `KeepaliveInterval`.
    pub keepalive_scale: NonZeroU64,
    /// Unit of the `Timestamp` on session-layer messages.
    pub timestamp_unit: TimestampUnit,
    /// Delay before shutting down once an execution report arrived.
    pub shutdown_delay: Duration,
    /// Bounded wait for the background worker on shutdown.
    pub worker_join_timeout: Duration,
    /// Order submitted once the session is established.
    pub order: OrderParams,
}

impl SessionConfig {
    /// Creates a new session configuration with required fields.
    ///
    /// # Arguments
    /// * `user_name` - Login user name
    /// * `password` - Login password
    /// * `order` - Order submitted on establishment
    #[must_use]
    pub fn new(user_name: impl Into<String>, password: impl Into<String>, order: OrderParams) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
            heartbeat_interval: HeartbeatInterval::default(),
            keepalive_scale: NonZeroU64::new(DEFAULT_KEEPALIVE_SCALE).unwrap_or(NonZeroU64::MIN),
            timestamp_unit: TimestampUnit::default(),
            shutdown_delay: DEFAULT_SHUTDOWN_DELAY,
            worker_join_timeout: DEFAULT_WORKER_JOIN_TIMEOUT,
            order,
        }
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub const fn with_heartbeat_interval(mut self, interval: HeartbeatInterval) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Sets the keepalive scale.
    #[must_use]
    pub const fn with_keepalive_scale(mut self, scale: NonZeroU64) -> Self {
        self.keepalive_scale = scale;
        self
    }

    /// Sets the unit of the session-layer `Timestamp`.
    #[must_use]
    pub const fn with_timestamp_unit(mut self, unit: TimestampUnit) -> Self {
        self.timestamp_unit = unit;
        self
    }

    /// Sets the delay between an execution report and shutdown.
    #[must_use]
    pub const fn with_shutdown_delay(mut self, delay: Duration) -> Self {
        self.shutdown_delay = delay;
        self
    }

    /// Sets the worker join timeout.
    #[must_use]
    pub const fn with_worker_join_timeout(mut self, timeout: Duration) -> Self {
        self.worker_join_timeout = timeout;
        self
    }

    /// Returns the trading account the order is booked on.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.order.account
    }

    /// Returns the `KeepaliveInterval` advertised in `Establish`.
    #[must_use]
    pub const fn keepalive_interval(&self) -> u64 {
        self.heartbeat_interval.keepalive(self.keepalive_scale.get())
    }
}

/// Builder for session configuration.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    user_name: Option<String>,
    password: Option<String>,
    heartbeat_interval_secs: Option<u64>,
    keepalive_scale: Option<u64>,
    timestamp_unit: Option<TimestampUnit>,
    shutdown_delay: Option<Duration>,
    worker_join_timeout: Option<Duration>,
    order: Option<OrderParams>,
}

impl SessionConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the login user name.
    #[must_use]
    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Sets the login password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the heartbeat interval in seconds.
    #[must_use]
    pub const fn heartbeat_interval_secs(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = Some(secs);
        self
    }

    /// Sets the keepalive scale.
    #[must_use]
    pub const fn keepalive_scale(mut self, scale: u64) -> Self {
        self.keepalive_scale = Some(scale);
        self
    }

    /// Sets the unit of the session-layer `Timestamp`.
    #[must_use]
    pub const fn timestamp_unit(mut self, unit: TimestampUnit) -> Self {
        self.timestamp_unit = Some(unit);
        self
    }

    /// Sets the delay between an execution report and shutdown.
    #[must_use]
    pub const fn shutdown_delay(mut self, delay: Duration) -> Self {
        self.shutdown_delay = Some(delay);
        self
    }

    /// Sets the worker join timeout.
    #[must_use]
    pub const fn worker_join_timeout(mut self, timeout: Duration) -> Self {
        self.worker_join_timeout = Some(timeout);
        self
    }

    /// Sets the order submitted on establishment.
    #[must_use]
    pub fn order(mut self, order: OrderParams) -> Self {
        self.order = Some(order);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// Returns `SessionError::Configuration` if the credentials are missing or
    /// empty, the heartbeat interval is zero, the keepalive scale is zero, or
    /// no order was set.
    pub fn build(self) -> Result<SessionConfig, SessionError> {
        let user_name = self.user_name.unwrap_or_default();
        if user_name.is_empty() {
            return Err(SessionError::Configuration("user name is required".into()));
        }
        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            return Err(SessionError::Configuration("password is required".into()));
        }
        let order = self
            .order
            .ok_or_else(|| SessionError::Configuration("order parameters are required".into()))?;

        let mut config = SessionConfig::new(user_name, password, order);

        if let Some(secs) = self.heartbeat_interval_secs {
            config.heartbeat_interval = HeartbeatInterval::from_secs(secs).ok_or_else(|| {
                SessionError::Configuration("heartbeat interval must be positive".into())
            })?;
        }
        if let Some(scale) = self.keepalive_scale {
            config.keepalive_scale = NonZeroU64::new(scale).ok_or_else(|| {
                SessionError::Configuration("keepalive scale must be positive".into())
            })?;
        }
        if let Some(unit) = self.timestamp_unit {
            config.timestamp_unit = unit;
        }
        if let Some(delay) = self.shutdown_delay {
            config.shutdown_delay = delay;
        }
        if let Some(timeout) = self.worker_join_timeout {
            config.worker_join_timeout = timeout;
        }

        Ok(config)
    }
}
