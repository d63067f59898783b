use std::fmt;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Framed;

use crate::codec::JsonFrameCodec;
use crate::error::BiolinkError;
use crate::message::Message;

/// One framed connection to the server.
///
/// Wraps any byte stream (a `TcpStream` in production, an in-memory
/// mock in tests). Dropping the transport releases the stream.
#[derive(Debug)]
pub struct FramedTransport<S> {
    framed: Framed<S, JsonFrameCodec>,
}

impl<S> FramedTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            framed: Framed::new(stream, JsonFrameCodec::new()),
        }
    }

    /// Encode and write one frame, flushing before returning.
    ///
    /// Oversized payloads fail with `PayloadTooLarge` before any byte is
    /// written.
    pub async fn send(&mut self, message: &Message) -> Result<(), BiolinkError> {
        self.framed.send(message).await
    }

    /// Wait for the next complete frame.
    ///
    /// `Ok(None)` means the peer closed the stream cleanly between
    /// frames. A close inside a frame is `BiolinkError::Framing`.
    pub async fn receive(&mut self) -> Result<Option<Message>, BiolinkError> {
        self.framed.next().await.transpose()
    }

    /// Shut down the write half and drop the stream.
    pub async fn close(self) -> Result<(), BiolinkError> {
        let mut stream = self.framed.into_inner();
        stream.shutdown().await?;
        Ok(())
    }
}

// ── ServerAddr ───────────────────────────────────────────────────

/// Host and port of the streaming server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddr {
    ip: String,
    port: u16,
}

impl ServerAddr {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self { ip: ip.into(), port }
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ip.contains(':') {
            write!(f, "[{}]:{}", self.ip, self.port)
        } else {
            write!(f, "{}:{}", self.ip, self.port)
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FramingError;
    use serde_json::json;
    use tokio_test::io::Builder;

    fn msg(value: serde_json::Value) -> Message {
        value.as_object().cloned().unwrap()
    }

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u16).to_be_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    #[tokio::test]
    async fn send_writes_exact_frame() {
        let expected = frame(br#"{"command":"auth","apiKey":"abc"}"#);
        let mock = Builder::new().write(&expected).build();
        let mut transport = FramedTransport::new(mock);

        transport
            .send(&crate::message::auth_message("abc"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn receive_one_byte_at_a_time() {
        let bytes = frame(br#"{"command":"valueChange","key":"focus","value":0.5}"#);
        let mut builder = Builder::new();
        for b in &bytes {
            builder.read(std::slice::from_ref(b));
        }
        let mut transport = FramedTransport::new(builder.build());

        let message = transport.receive().await.unwrap().unwrap();
        assert_eq!(
            message,
            msg(json!({"command": "valueChange", "key": "focus", "value": 0.5}))
        );
        assert!(transport.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn receive_several_frames_in_one_read() {
        let mut bytes = frame(br#"{"command":"a"}"#);
        bytes.extend(frame(br#"{"command":"b"}"#));
        let mut transport = FramedTransport::new(Builder::new().read(&bytes).build());

        let first = transport.receive().await.unwrap().unwrap();
        let second = transport.receive().await.unwrap().unwrap();
        assert_eq!(first["command"], "a");
        assert_eq!(second["command"], "b");
        assert!(transport.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clean_close_is_end_of_stream() {
        let mut transport = FramedTransport::new(Builder::new().build());
        assert!(transport.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn close_after_prefix_is_framing_error() {
        let mock = Builder::new().read(&[0x00, 0x10]).read(b"{\"com").build();
        let mut transport = FramedTransport::new(mock);

        let err = transport.receive().await.unwrap_err();
        assert!(matches!(
            err,
            BiolinkError::Framing(FramingError::TruncatedPayload {
                expected: 16,
                received: 5
            })
        ));
    }

    #[tokio::test]
    async fn close_mid_prefix_is_framing_error() {
        let mut transport = FramedTransport::new(Builder::new().read(&[0x00]).build());
        let err = transport.receive().await.unwrap_err();
        assert!(matches!(
            err,
            BiolinkError::Framing(FramingError::TruncatedPrefix { received: 1 })
        ));
    }

    #[tokio::test]
    async fn read_error_is_io() {
        let mock = Builder::new()
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            ))
            .build();
        let mut transport = FramedTransport::new(mock);

        let err = transport.receive().await.unwrap_err();
        assert!(matches!(err, BiolinkError::Io(_)));
    }

    #[tokio::test]
    async fn write_error_is_io() {
        let mock = Builder::new()
            .write_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe"))
            .build();
        let mut transport = FramedTransport::new(mock);

        let err = transport
            .send(&msg(json!({"command": "auth"})))
            .await
            .unwrap_err();
        assert!(matches!(err, BiolinkError::Io(_)));
    }

    #[test]
    fn server_addr_display() {
        assert_eq!(ServerAddr::new("192.168.68.116", 38641).to_string(), "192.168.68.116:38641");
        assert_eq!(ServerAddr::new("::1", 80).to_string(), "[::1]:80");
    }
}
