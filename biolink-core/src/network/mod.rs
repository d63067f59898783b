//! TCP connectivity: address, connector seam and framed transport.

pub mod connection;
pub mod connector;

pub use connection::{FramedTransport, ServerAddr};
pub use connector::{Connector, TcpConnector};
