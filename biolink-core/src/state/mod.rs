//! Session lifecycle state.

pub mod session;

pub use session::SessionPhase;
