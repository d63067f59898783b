//! # biolink-client: terminal metrics client
//!
//! Connects to a biometric streaming server, authenticates with an API
//! key and prints live enjoyment / focus / heart-rate values as they
//! arrive. In verbose mode every raw message is printed instead.

pub mod config;
pub mod display;
