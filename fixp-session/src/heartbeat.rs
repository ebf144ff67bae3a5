/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Heartbeat interval and scheduling state.
//!
//! This module handles FIXP keepalive logic including:
//! - The heartbeat interval fixed at session construction
//! - Deriving the advertised `KeepaliveInterval` from that interval
//! - Tracking whether a heartbeat timer is currently armed

use fixp_message::fixp::keepalive_interval;
use std::num::NonZeroU64;
use std::time::Duration;

/// Heartbeat interval used when none is configured, in seconds.
pub const DEFAULT_HEARTBEAT_SECS: u64 = 3;

/// Heartbeat interval in whole seconds, always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeartbeatInterval(NonZeroU64);

impl HeartbeatInterval {
    /// Creates an interval from seconds.
    ///
    /// Returns `None` for zero.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Option<Self> {
        match NonZeroU64::new(secs) {
            Some(secs) => Some(Self(secs)),
            None => None,
        }
    }

    /// Returns the interval in seconds.
    #[inline]
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0.get()
    }

    /// Returns the interval as a scheduling delay.
    #[inline]
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0.get())
    }

    /// Returns the `KeepaliveInterval` advertised for this interval.
    ///
    /// # Arguments
    /// * `scale` - Multiplier applied to the interval in seconds
    #[inline]
    #[must_use]
    pub const fn keepalive(self, scale: u64) -> u64 {
        keepalive_interval(self.0.get(), scale)
    }
}

impl Default for HeartbeatInterval {
    fn default() -> Self {
        Self(NonZeroU64::new(DEFAULT_HEARTBEAT_SECS).unwrap_or(NonZeroU64::MIN))
    }
}

/// Manages heartbeat timing for a FIXP session.
#[derive(Debug)]
pub struct HeartbeatManager {
    /// Heartbeat interval.
    interval: HeartbeatInterval,
    /// Whether a heartbeat timer is pending.
    armed: bool,
}

impl HeartbeatManager {
    /// Creates a new heartbeat manager with the specified interval.
    ///
    /// # Arguments
    /// * `interval` - The heartbeat interval
    #[must_use]
    pub const fn new(interval: HeartbeatInterval) -> Self {
        Self {
            interval,
            armed: false,
        }
    }

    /// Arms the heartbeat timer.
    ///
    /// Returns the delay to schedule, or `None` if a timer is already pending.
    pub fn arm(&mut self) -> Option<Duration> {
        if self.armed {
            return None;
        }
        self.armed = true;
        Some(self.interval.as_duration())
    }

    /// Records that the pending heartbeat timer fired.
    #[inline]
    pub fn on_fired(&mut self) {
        self.armed = false;
    }

    /// Forgets any pending timer; a later firing is treated as stale.
    #[inline]
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Returns true if a heartbeat timer is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns the heartbeat interval.
    #[must_use]
    pub const fn interval(&self) -> HeartbeatInterval {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_rejects_zero() {
        assert!(HeartbeatInterval::from_secs(0).is_none());
        let interval = HeartbeatInterval::from_secs(30).unwrap();
        assert_eq!(interval.as_secs(), 30);
        assert_eq!(interval.as_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(HeartbeatInterval::default().as_secs(), 3);
    }

    #[test]
    fn test_keepalive_derived_from_interval() {
        let interval = HeartbeatInterval::from_secs(3).unwrap();
        assert_eq!(interval.keepalive(10_000), 30_000);
        assert_eq!(interval.keepalive(1_000), 3_000);
    }

    #[test]
    fn test_arm_once() {
        let mut mgr = HeartbeatManager::new(HeartbeatInterval::from_secs(5).unwrap());
        assert_eq!(mgr.arm(), Some(Duration::from_secs(5)));
        assert!(mgr.is_armed());
        assert_eq!(mgr.arm(), None);

        mgr.on_fired();
        assert!(!mgr.is_armed());
        assert_eq!(mgr.arm(), Some(Duration::from_secs(5)));

        mgr.disarm();
        assert!(!mgr.is_armed());
    }

    #[test]
    fn test_disarm_then_stale_fire_allows_single_rearm() {
        let mut mgr = HeartbeatManager::new(HeartbeatInterval::default());
        assert_eq!(mgr.arm(), Some(Duration::from_secs(3)));

        mgr.disarm();
        mgr.on_fired();
        assert!(!mgr.is_armed());
        assert_eq!(mgr.arm(), Some(Duration::from_secs(3)));
        assert_eq!(mgr.arm(), None);
        assert_eq!(mgr.interval(), HeartbeatInterval::default());
    }
}
