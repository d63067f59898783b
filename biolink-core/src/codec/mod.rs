//! Length-prefixed JSON codec.
//!
//! ## Wire format
//!
//! ```text
//! length:   u16 big-endian (2)
//! payload:  [u8] UTF-8 JSON object (length bytes, ≤ 65535)
//! ```
//!
//! The decoder never consumes a partial frame, so it is indifferent to
//! how TCP splits the bytes. `decode_eof` turns a leftover partial frame
//! into a [`FramingError`] instead of the generic "bytes remaining" I/O
//! error `tokio_util` would report.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{BiolinkError, FramingError};
use crate::message::Message;

// ── Constants ────────────────────────────────────────────────────

/// Size of the big-endian length prefix.
pub const PREFIX_LEN: usize = 2;

/// Largest payload the prefix can describe.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

// ── JsonFrameCodec ───────────────────────────────────────────────

/// `tokio_util` codec for `[u16 BE length][JSON payload]` frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFrameCodec;

impl JsonFrameCodec {
    pub fn new() -> Self {
        Self
    }

    /// Peek at the declared payload length without consuming anything.
    fn declared_len(src: &BytesMut) -> Option<usize> {
        if src.len() < PREFIX_LEN {
            return None;
        }
        Some(u16::from_be_bytes([src[0], src[1]]) as usize)
    }
}

impl Decoder for JsonFrameCodec {
    type Item = Message;
    type Error = BiolinkError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(len) = Self::declared_len(src) else {
            return Ok(None);
        };

        let frame_len = PREFIX_LEN + len;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(PREFIX_LEN);
        let payload = src.split_to(len);
        let message = serde_json::from_slice::<Message>(&payload)?;
        Ok(Some(message))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(message) = self.decode(src)? {
            return Ok(Some(message));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let err = match Self::declared_len(src) {
            None => FramingError::TruncatedPrefix {
                received: src.len(),
            },
            Some(expected) => FramingError::TruncatedPayload {
                expected,
                received: src.len() - PREFIX_LEN,
            },
        };
        src.clear();
        Err(err.into())
    }
}

impl Encoder<&Message> for JsonFrameCodec {
    type Error = BiolinkError;

    fn encode(&mut self, item: &Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let payload = serde_json::to_vec(item).map_err(BiolinkError::Encode)?;
        let len = u16::try_from(payload.len()).map_err(|_| BiolinkError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_LEN,
        })?;

        dst.reserve(PREFIX_LEN + payload.len());
        dst.put_u16(len);
        dst.extend_from_slice(&payload);
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
