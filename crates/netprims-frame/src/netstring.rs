//! Netstring framing: `<decimal length>:<payload>,`.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::frame::{Frame, Framer, DEFAULT_MAX_PAYLOAD};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Longest length prefix accepted: enough digits for a 32-bit payload size.
const MAX_LENGTH_DIGITS: usize = 10;

/// Length-prefixed framing safe for arbitrary payload content.
///
/// Wire format:
///
/// ```text
/// ┌────────────────┬─────┬──────────────────┬─────┐
/// │ Length (ASCII  │ ':' │ Payload          │ ',' │
/// │ decimal)       │     │ (Length bytes)   │     │
/// └────────────────┴─────┴──────────────────┴─────┘
/// ```
///
/// `frame(b"hello")` produces `b"5:hello,"`. Because the length is explicit,
/// payloads may contain any bytes, including delimiter-like ones. A declared
/// length above the configured maximum fails immediately; the framer never
/// buffers an oversize frame waiting for it to complete.
pub struct NetstringFramer {
    buf: BytesMut,
    max_payload: usize,
}

impl NetstringFramer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Set the maximum accepted payload size.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Locate and validate the length prefix.
    ///
    /// Returns `(colon_index, payload_length)` once the full prefix is
    /// buffered, `None` if more bytes are needed.
    fn parse_length(&self) -> Result<Option<(usize, usize)>> {
        let mut colon = None;
        for (index, byte) in self.buf.iter().enumerate() {
            match byte {
                b'0'..=b'9' if index < MAX_LENGTH_DIGITS => continue,
                b':' => {
                    colon = Some(index);
                    break;
                }
                other => {
                    return Err(FrameError::Malformed(format!(
                        "invalid byte 0x{other:02x} in length prefix at offset {index}"
                    )));
                }
            }
        }

        let Some(colon) = colon else {
            // All buffered bytes were digits; wait for the colon.
            return Ok(None);
        };
        if colon == 0 {
            return Err(FrameError::Malformed("empty length prefix".into()));
        }

        // The prefix is pure ASCII digits, capped at MAX_LENGTH_DIGITS, so
        // it always fits in u64.
        let digits = std::str::from_utf8(&self.buf[..colon]).expect("digits are ASCII");
        let length = digits.parse::<u64>().expect("digits parse as u64") as usize;

        if length > self.max_payload {
            return Err(FrameError::PayloadTooLarge {
                size: length,
                max: self.max_payload,
            });
        }

        Ok(Some((colon, length)))
    }
}

impl Default for NetstringFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer for NetstringFramer {
    fn frame(&self, frame: &Frame) -> Result<Bytes> {
        if frame.payload.len() > self.max_payload {
            return Err(FrameError::PayloadTooLarge {
                size: frame.payload.len(),
                max: self.max_payload,
            });
        }

        let prefix = format!("{}:", frame.payload.len());
        let mut wire = BytesMut::with_capacity(prefix.len() + frame.payload.len() + 1);
        wire.put_slice(prefix.as_bytes());
        wire.put_slice(&frame.payload);
        wire.put_u8(b',');
        Ok(wire.freeze())
    }

    fn feed(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buf.extend_from_slice(data);

        let mut frames = Vec::new();
        loop {
            let Some((colon, length)) = self.parse_length()? else {
                break;
            };

            let total = colon + 1 + length + 1;
            if self.buf.len() < total {
                break;
            }

            if self.buf[colon + 1 + length] != b',' {
                return Err(FrameError::Malformed(format!(
                    "expected trailing ',' after {length}-byte payload, got 0x{:02x}",
                    self.buf[colon + 1 + length]
                )));
            }

            self.buf.advance(colon + 1);
            let payload = self.buf.split_to(length).freeze();
            self.buf.advance(1);
            frames.push(Frame::new(payload));
        }

        Ok(frames)
    }
}
