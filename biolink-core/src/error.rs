//! Domain-specific error types for the biolink client.
//!
//! All fallible operations return `Result<T, BiolinkError>`.
//! Framing, decoding and socket failures are kept apart so the session
//! loop can log exactly what ended it.

use thiserror::Error;

/// The canonical error type for the biolink client.
#[derive(Debug, Error)]
pub enum BiolinkError {
    // ── Connection Errors ────────────────────────────────────────
    /// Every connect attempt failed; carries the last socket error.
    #[error("failed to connect to {addr} after {attempts} attempt(s): {source}")]
    Connect {
        addr: String,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// The TCP/IO layer reported an error on an established connection.
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    // ── Framing Errors ───────────────────────────────────────────
    /// The stream ended in the middle of a frame.
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// The outbound payload does not fit in the u16 length prefix.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    // ── Serialization Errors ─────────────────────────────────────
    /// A payload was not valid UTF-8, not valid JSON, or not an object.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An outbound message could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    // ── State Errors ─────────────────────────────────────────────
    /// A lifecycle transition was attempted from the wrong phase.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),
}

// ── FramingError ─────────────────────────────────────────────────

/// A truncated frame: the peer closed the stream before a whole frame
/// arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Closed after some, but not all, bytes of the length prefix.
    #[error("stream closed mid-prefix ({received} of 2 bytes)")]
    TruncatedPrefix { received: usize },

    /// Closed after the prefix but before the full payload.
    #[error("stream closed mid-payload ({received} of {expected} bytes)")]
    TruncatedPayload { expected: usize, received: usize },
}

impl BiolinkError {
    /// `true` for errors that mean the byte stream itself is unusable
    /// (I/O or framing), as opposed to a bad payload.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Framing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = BiolinkError::PayloadTooLarge {
            size: 70000,
            max: 65535,
        };
        assert!(e.to_string().contains("70000"));
        assert!(e.to_string().contains("65535"));

        let e = BiolinkError::Framing(FramingError::TruncatedPayload {
            expected: 10,
            received: 4,
        });
        assert!(e.to_string().contains("4 of 10"));
    }

    #[test]
    fn connect_error_names_address_and_attempts() {
        let e = BiolinkError::Connect {
            addr: "10.0.0.1:38641".into(),
            attempts: 3,
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        let text = e.to_string();
        assert!(text.contains("10.0.0.1:38641"));
        assert!(text.contains("3 attempt"));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: BiolinkError = io_err.into();
        assert!(matches!(e, BiolinkError::Io(_)));
        assert!(e.is_transport());
    }

    #[test]
    fn decode_is_not_transport() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: BiolinkError = json_err.into();
        assert!(matches!(e, BiolinkError::Decode(_)));
        assert!(!e.is_transport());
    }
}
