//! # biolink-core
//!
//! Client-side protocol library for biometric streaming servers.
//!
//! This crate contains:
//! - **Codec**: `JsonFrameCodec`, a u16 big-endian length-prefixed JSON codec for `tokio_util`
//! - **Transport**: `FramedTransport` wrapping one byte stream with `send` / `receive`
//! - **Message**: the JSON `Message` model and the `Inbound` command sum type
//! - **Metrics**: `Metric` and the fixed-key `MetricSnapshot`
//! - **State**: `SessionPhase`, the validated connection lifecycle state machine
//! - **Session**: `SessionController` with connect retry, auth and dispatch
//! - **Error**: `BiolinkError`, the typed `thiserror` error hierarchy

pub mod codec;
pub mod error;
pub mod message;
pub mod metrics;
pub mod network;
pub mod session;
pub mod state;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use codec::{JsonFrameCodec, MAX_PAYLOAD_LEN, PREFIX_LEN};
pub use error::{BiolinkError, FramingError};
pub use message::{Inbound, Message, ValueChange, auth_message};
pub use metrics::{Metric, MetricSnapshot};
pub use network::{Connector, FramedTransport, ServerAddr, TcpConnector};
pub use session::{CloseReason, SessionConfig, SessionController, SessionObserver, SessionReport};
pub use state::SessionPhase;
