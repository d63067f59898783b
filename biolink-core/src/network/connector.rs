//! How the session obtains a byte stream.
//!
//! The session controller only needs "give me a stream to this address";
//! `Connector` is that seam, so retry behaviour can be driven by a
//! scripted connector in tests.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::network::ServerAddr;

/// Opens a connection to the server.
#[async_trait]
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn connect(&self, addr: &ServerAddr) -> std::io::Result<Self::Stream>;
}

// ── TcpConnector ─────────────────────────────────────────────────

/// Plain TCP connector with an optional connect timeout.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, addr: &ServerAddr) -> std::io::Result<TcpStream> {
        let connect = TcpStream::connect((addr.ip(), addr.port()));
        let stream = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("connect timed out after {limit:?}"),
                )
            })??,
            None => connect.await?,
        };
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

// ── Tests ────────────────────────────────────────────────────────
