//! Session lifecycle state machine.
//!
//! `SessionPhase` models one run of the client from the first connect
//! attempt to a terminal state, with validated transitions that return
//! `Result` instead of panicking.

use std::time::Instant;

use crate::error::BiolinkError;

// ── SessionPhase ─────────────────────────────────────────────────

/// The current phase of a client session.
///
/// ```text
///  Disconnected ──► Connecting ──► Authenticating ──► Active ──► Closed
///                    ▲      │            │
///                    │      ▼            └──────────────────────► Closed
///                  Backoff ◄┤
///                           └──► Failed   (attempts exhausted)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing attempted yet.
    #[default]
    Disconnected,

    /// Connect attempt `attempt` (1-based) in flight.
    Connecting { attempt: u32 },

    /// Waiting before the next attempt; `attempt` have failed so far.
    Backoff { attempt: u32 },

    /// Socket is up; the auth message is being sent.
    Authenticating,

    /// Receiving and dispatching messages.
    Active {
        /// When the session entered the `Active` state.
        since: Instant,
    },

    /// The session ended (server close or mid-session error). Terminal.
    Closed,

    /// Every connect attempt failed. Terminal.
    Failed { attempts: u32 },
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting { attempt } => write!(f, "Connecting (attempt {attempt})"),
            Self::Backoff { attempt } => write!(f, "Backoff (after attempt {attempt})"),
            Self::Authenticating => write!(f, "Authenticating"),
            Self::Active { .. } => write!(f, "Active"),
            Self::Closed => write!(f, "Closed"),
            Self::Failed { attempts } => write!(f, "Failed ({attempts} attempts)"),
        }
    }
}

impl SessionPhase {
    /// Returns `true` while messages are being received.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Returns `true` for `Closed` and `Failed`; neither reconnects.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Failed { .. })
    }

    /// How long the session has been `Active`.
    ///
    /// Returns `None` for any other phase.
    pub fn active_duration(&self) -> Option<std::time::Duration> {
        match self {
            Self::Active { since } => Some(since.elapsed()),
            _ => None,
        }
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Transition to `Connecting`, returning the attempt number.
    ///
    /// Valid from: `Disconnected`, `Backoff`.
    pub fn begin_connect(&mut self) -> Result<u32, BiolinkError> {
        let attempt = match self {
            Self::Disconnected => 1,
            Self::Backoff { attempt } => *attempt + 1,
            _ => {
                return Err(BiolinkError::ProtocolViolation(
                    "cannot connect: not in Disconnected or Backoff state",
                ));
            }
        };
        *self = Self::Connecting { attempt };
        Ok(attempt)
    }

    /// Record a failed connect attempt. Moves to `Backoff` while
    /// attempts remain, otherwise to `Failed`.
    ///
    /// Valid from: `Connecting`.
    pub fn connect_failed(&mut self, max_attempts: u32) -> Result<(), BiolinkError> {
        match self {
            Self::Connecting { attempt } => {
                let attempt = *attempt;
                *self = if attempt < max_attempts {
                    Self::Backoff { attempt }
                } else {
                    Self::Failed { attempts: attempt }
                };
                Ok(())
            }
            _ => Err(BiolinkError::ProtocolViolation(
                "cannot fail connect: not in Connecting state",
            )),
        }
    }

    /// Transition to `Authenticating`.
    ///
    /// Valid from: `Connecting`.
    pub fn begin_auth(&mut self) -> Result<(), BiolinkError> {
        match self {
            Self::Connecting { .. } => {
                *self = Self::Authenticating;
                Ok(())
            }
            _ => Err(BiolinkError::ProtocolViolation(
                "cannot authenticate: not in Connecting state",
            )),
        }
    }

    /// Transition to `Active`.
    ///
    /// Valid from: `Authenticating`.
    pub fn activate(&mut self) -> Result<(), BiolinkError> {
        match self {
            Self::Authenticating => {
                *self = Self::Active {
                    since: Instant::now(),
                };
                Ok(())
            }
            _ => Err(BiolinkError::ProtocolViolation(
                "cannot activate: not in Authenticating state",
            )),
        }
    }

    /// Transition to `Closed`.
    ///
    /// Valid from: `Authenticating`, `Active`.
    pub fn close(&mut self) -> Result<(), BiolinkError> {
        match self {
            Self::Authenticating | Self::Active { .. } => {
                *self = Self::Closed;
                Ok(())
            }
            _ => Err(BiolinkError::ProtocolViolation(
                "cannot close: no connection is open",
            )),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
