//! Message-type-identifier (MTI) framing.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{FrameError, Result};
use crate::frame::{Frame, Framer, DEFAULT_MAX_PAYLOAD};

/// Frame header: type_id (4) + length (4) = 8 bytes.
pub const MTI_HEADER_SIZE: usize = 8;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Binary framing with a per-frame message type identifier.
///
/// Wire format:
///
/// ```text
/// ┌─────────────┬─────────────┬──────────────────┐
/// │ Type id     │ Length      │ Payload          │
/// │ (4B LE)     │ (4B LE)     │ (Length bytes)   │
/// └─────────────┴─────────────┴──────────────────┘
/// ```
///
/// The type id travels in the header, so the receiving endpoint can resolve a
/// content type before looking at the payload. Zero-length payloads are valid
/// and useful: a header-only frame delivers just the type id, which is enough
/// for simple event notifications. Safe for arbitrary binary payloads.
pub struct MtiFramer {
    buf: BytesMut,
    max_payload: usize,
}

impl MtiFramer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Set the maximum accepted payload size.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload.min(u32::MAX as usize);
        self
    }
}

impl Default for MtiFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer for MtiFramer {
    fn frame(&self, frame: &Frame) -> Result<Bytes> {
        if frame.payload.len() > self.max_payload {
            return Err(FrameError::PayloadTooLarge {
                size: frame.payload.len(),
                max: self.max_payload,
            });
        }

        let mut wire = BytesMut::with_capacity(MTI_HEADER_SIZE + frame.payload.len());
        wire.put_u32_le(frame.type_id);
        wire.put_u32_le(frame.payload.len() as u32);
        wire.put_slice(&frame.payload);
        Ok(wire.freeze())
    }

    fn feed(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buf.extend_from_slice(data);

        let mut frames = Vec::new();
        while self.buf.len() >= MTI_HEADER_SIZE {
            let type_id = u32::from_le_bytes(self.buf[0..4].try_into().expect("4 bytes"));
            let length = u32::from_le_bytes(self.buf[4..8].try_into().expect("4 bytes")) as usize;

            if length > self.max_payload {
                return Err(FrameError::PayloadTooLarge {
                    size: length,
                    max: self.max_payload,
                });
            }

            if self.buf.len() < MTI_HEADER_SIZE + length {
                break;
            }

            self.buf.advance(MTI_HEADER_SIZE);
            let payload = self.buf.split_to(length).freeze();
            trace!(type_id, length, "frame extracted");
            frames.push(Frame::typed(type_id, payload));
        }

        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let framer = MtiFramer::new();
        let wire = framer.frame(&Frame::typed(1, &b"\x01\x02"[..])).unwrap();
        assert_eq!(wire.len(), MTI_HEADER_SIZE + 2);

        let mut framer = MtiFramer::new();
        let frames = framer.feed(&wire).unwrap();
        assert_eq!(frames, vec![Frame::typed(1, &b"\x01\x02"[..])]);
    }

    #[test]
    fn wire_layout_is_type_then_length_le() {
        let framer = MtiFramer::new();
        let wire = framer.frame(&Frame::typed(0x0102, &b"ab"[..])).unwrap();
        assert_eq!(
            wire.as_ref(),
            &[0x02, 0x01, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, b'a', b'b']
        );
    }

    #[test]
    fn zero_length_payload_delivers_type_only() {
        let framer = MtiFramer::new();
        let wire = framer.frame(&Frame::typed(42, &b""[..])).unwrap();
        assert_eq!(wire.len(), MTI_HEADER_SIZE);

        let mut framer = MtiFramer::new();
        let frames = framer.feed(&wire).unwrap();
        assert_eq!(frames, vec![Frame::typed(42, &b""[..])]);
    }

    #[test]
    fn partial_header_then_partial_payload() {
        let framer = MtiFramer::new();
        let wire = framer.frame(&Frame::typed(7, &b"payload"[..])).unwrap();

        let mut receiver = MtiFramer::new();
        assert!(receiver.feed(&wire[..3]).unwrap().is_empty());
        assert!(receiver.feed(&wire[3..10]).unwrap().is_empty());
        let frames = receiver.feed(&wire[10..]).unwrap();
        assert_eq!(frames, vec![Frame::typed(7, &b"payload"[..])]);
    }

    #[test]
    fn byte_at_a_time_matches_single_feed() {
        let framer = MtiFramer::new();
        let mut wire = BytesMut::new();
        wire.extend_from_slice(&framer.frame(&Frame::typed(1, &b"one"[..])).unwrap());
        wire.extend_from_slice(&framer.frame(&Frame::typed(2, &b""[..])).unwrap());
        wire.extend_from_slice(&framer.frame(&Frame::typed(3, &b"three"[..])).unwrap());

        let mut all_at_once = MtiFramer::new();
        let expected = all_at_once.feed(&wire).unwrap();

        let mut byte_wise = MtiFramer::new();
        let mut collected = Vec::new();
        for byte in wire.iter() {
            collected.extend(byte_wise.feed(std::slice::from_ref(byte)).unwrap());
        }

        assert_eq!(collected, expected);
        assert_eq!(expected.len(), 3);
    }

    #[test]
    fn oversize_declared_length_fails_without_buffering() {
        let mut framer = MtiFramer::new().with_max_payload(16);
        let mut wire = BytesMut::new();
        wire.put_u32_le(9);
        wire.put_u32_le(1024);

        let err = framer.feed(&wire).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge { size: 1024, max: 16 }
        ));
    }

    #[test]
    fn frame_rejects_oversize_payload() {
        let framer = MtiFramer::new().with_max_payload(2);
        let err = framer.frame(&Frame::typed(1, &b"abc"[..])).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[test]
    fn interleaved_type_ids_preserved_in_order() {
        let framer = MtiFramer::new();
        let mut wire = BytesMut::new();
        for (type_id, payload) in [(5u32, &b"a"[..]), (9, &b"bb"[..]), (5, &b"ccc"[..])] {
            wire.extend_from_slice(&framer.frame(&Frame::typed(type_id, payload)).unwrap());
        }

        let mut receiver = MtiFramer::new();
        let frames = receiver.feed(&wire).unwrap();
        assert_eq!(
            frames,
            vec![
                Frame::typed(5, &b"a"[..]),
                Frame::typed(9, &b"bb"[..]),
                Frame::typed(5, &b"ccc"[..]),
            ]
        );
    }
}
