//! Session controller: connect with retry, authenticate, then receive
//! and dispatch messages until the server closes the stream.

pub mod controller;
pub mod observer;

use std::time::Duration;

use crate::error::BiolinkError;
use crate::metrics::MetricSnapshot;
use crate::network::ServerAddr;

pub use controller::SessionController;
pub use observer::SessionObserver;

// ── Constants ────────────────────────────────────────────────────

/// Connect attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed pause between connect attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

// ── SessionConfig ────────────────────────────────────────────────

/// Everything the controller needs to reach and authenticate with the
/// server.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub addr: ServerAddr,
    pub api_key: String,
    /// Total connect attempts, at least 1.
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl SessionConfig {
    pub fn new(addr: ServerAddr, api_key: impl Into<String>) -> Self {
        Self {
            addr,
            api_key: api_key.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

// ── SessionReport ────────────────────────────────────────────────

/// Why an established session ended.
#[derive(Debug)]
pub enum CloseReason {
    /// The server closed the stream between frames.
    EndOfStream,
    /// A socket, framing or decode error ended the session.
    Error(BiolinkError),
}

impl CloseReason {
    pub fn is_graceful(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

/// Outcome of a session that got past the connect phase.
#[derive(Debug)]
pub struct SessionReport {
    pub close: CloseReason,
    /// Frames decoded during the session.
    pub messages: u64,
    /// Metric values at the moment the session ended.
    pub snapshot: MetricSnapshot,
}
