/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Session states and the transitions allowed between them.
//!
//! Transitions are driven by inbound documents, so the state is a runtime
//! value owned by the session. `Closed` is reachable from every state on
//! transport failure; every other state is entered in order.

use std::fmt;

/// Lifecycle state of a FIXP session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Transport connected, waiting for it to open.
    #[default]
    Connecting,
    /// Negotiate sent, handshake in progress.
    Negotiating,
    /// EstablishmentAck received, business messages flow.
    Established,
    /// Shutdown requested, background work and transport being released.
    ShuttingDown,
    /// Transport closed. Terminal.
    Closed,
}

impl SessionState {
    /// Returns true if the transport is open and the session has not begun
    /// shutting down.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Negotiating | Self::Established)
    }

    /// Returns true once shutdown has started or completed.
    #[must_use]
    pub const fn is_terminating(self) -> bool {
        matches!(self, Self::ShuttingDown | Self::Closed)
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Negotiating)
                | (Self::Negotiating, Self::Established)
                | (
                    Self::Connecting | Self::Negotiating | Self::Established,
                    Self::ShuttingDown
                )
                | (
                    Self::Connecting
                        | Self::Negotiating
                        | Self::Established
                        | Self::ShuttingDown,
                    Self::Closed
                )
        )
    }

    /// Returns the state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting",
            Self::Negotiating => "Negotiating",
            Self::Established => "Established",
            Self::ShuttingDown => "ShuttingDown",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
