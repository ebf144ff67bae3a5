/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! One-shot session timers on the reactor.

use fixp_session::io::TimerKind;
use futures_util::StreamExt;
use std::time::Duration;
use tokio_util::time::DelayQueue;
use tracing::debug;

/// Pending session timers, fired in deadline order.
#[derive(Debug, Default)]
pub struct TimerService {
    queue: DelayQueue<TimerKind>,
}

impl TimerService {
    /// Creates an empty timer service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `timer` to fire once after `delay`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&mut self, delay: Duration, timer: TimerKind) {
        debug!(%timer, delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "Timer scheduled");
        self.queue.insert(timer, delay);
    }

    /// Waits for the next timer to fire.
    ///
    /// Never completes while nothing is scheduled. Cancel safe.
    pub async fn next_expired(&mut self) -> TimerKind {
        loop {
            if self.queue.is_empty() {
                std::future::pending::<()>().await;
            }
            if let Some(expired) = self.queue.next().await {
                return expired.into_inner();
            }
        }
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
