/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Effects the session asks of its driver.
//!
//! The session never touches a socket or a clock directly. It issues sends,
//! timer requests and a close through [`SessionIo`]; the engine maps them to
//! the WebSocket and the runtime, and [`Outbox`] records them for inspection.

use std::fmt;
use std::time::Duration;

/// Timers the session can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Send an `UnsequencedHeartbeat`.
    Heartbeat,
    /// Run the shutdown sequence.
    Shutdown,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heartbeat => f.write_str("Heartbeat"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Outbound effects of the session.
pub trait SessionIo {
    /// Queues a text frame for the transport, in call order.
    fn send(&mut self, frame: String);

    /// Requests `timer` to fire once after `delay`.
    fn schedule(&mut self, delay: Duration, timer: TimerKind);

    /// Closes the transport.
    fn close(&mut self);
}

/// One recorded effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A text frame was sent.
    Send(String),
    /// A timer was scheduled.
    Schedule {
        /// Delay before firing.
        delay: Duration,
        /// Timer to fire.
        timer: TimerKind,
    },
    /// The transport was closed.
    Close,
}

/// [`SessionIo`] that records every effect in order.
#[derive(Debug, Default)]
pub struct Outbox {
    commands: Vec<Command>,
}

impl Outbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded effects in order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns the sent frames in order.
    pub fn sent(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            Command::Send(frame) => Some(frame.as_str()),
            _ => None,
        })
    }

    /// Returns the number of sent frames.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent().count()
    }

    /// Returns the scheduled timers in order.
    pub fn scheduled(&self) -> impl Iterator<Item = (Duration, TimerKind)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            Command::Schedule { delay, timer } => Some((*delay, *timer)),
            _ => None,
        })
    }

    /// Returns how many times `timer` was scheduled.
    #[must_use]
    pub fn scheduled_count(&self, timer: TimerKind) -> usize {
        self.scheduled().filter(|(_, t)| *t == timer).count()
    }

    /// Returns how many times the transport was closed.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Close))
            .count()
    }

    /// Removes and returns all recorded effects.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl SessionIo for Outbox {
    fn send(&mut self, frame: String) {
        self.commands.push(Command::Send(frame));
    }

    fn schedule(&mut self, delay: Duration, timer: TimerKind) {
        self.commands.push(Command::Schedule { delay, timer });
    }

    fn close(&mut self) {
        self.commands.push(Command::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbox_records_in_order() {
        let mut outbox = Outbox::new();
        assert!(outbox.is_empty());

        outbox.send("a".into());
        outbox.schedule(Duration::from_secs(3), TimerKind::Heartbeat);
        outbox.send("b".into());
        outbox.close();

        assert_eq!(outbox.sent().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(outbox.sent_count(), 2);
        assert_eq!(outbox.scheduled_count(TimerKind::Heartbeat), 1);
        assert_eq!(outbox.scheduled_count(TimerKind::Shutdown), 0);
        assert_eq!(outbox.close_count(), 1);
        assert_eq!(outbox.commands().len(), 4);

        let drained = outbox.drain();
        assert_eq!(drained.last(), Some(&Command::Close));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_timer_kind_display() {
        assert_eq!(TimerKind::Heartbeat.to_string(), "Heartbeat");
        assert_eq!(TimerKind::Shutdown.to_string(), "Shutdown");
    }
}
