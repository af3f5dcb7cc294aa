//! Terminator-delimited framing.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::frame::{Frame, Framer, DEFAULT_MAX_PAYLOAD};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Frames delimited by a configurable terminator byte sequence.
///
/// `frame` appends the terminator; `feed` splits on it. A payload that itself
/// contains the terminator corrupts framing; that is an accepted limitation
/// of this variant, not a bug, and no escaping is applied. Use the netstring
/// or MTI framer for arbitrary binary payloads.
///
/// Empty frames (two consecutive terminators on the wire) are emitted with an
/// empty payload.
pub struct DelimitedFramer {
    terminator: Vec<u8>,
    buf: BytesMut,
    max_payload: usize,
}

impl DelimitedFramer {
    /// A framer with the default `\n` terminator.
    pub fn new() -> Self {
        Self::with_terminator(b"\n")
    }

    /// A framer with an explicit terminator sequence.
    ///
    /// # Panics
    ///
    /// Panics if `terminator` is empty.
    pub fn with_terminator(terminator: &[u8]) -> Self {
        assert!(!terminator.is_empty(), "terminator must not be empty");
        Self {
            terminator: terminator.to_vec(),
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Set the maximum bytes buffered while waiting for a terminator.
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    fn find_terminator(&self) -> Option<usize> {
        if self.buf.len() < self.terminator.len() {
            return None;
        }
        self.buf
            .windows(self.terminator.len())
            .position(|window| window == self.terminator.as_slice())
    }
}

impl Default for DelimitedFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer for DelimitedFramer {
    fn frame(&self, frame: &Frame) -> Result<Bytes> {
        if frame.payload.len() > self.max_payload {
            return Err(FrameError::PayloadTooLarge {
                size: frame.payload.len(),
                max: self.max_payload,
            });
        }
        let mut wire = BytesMut::with_capacity(frame.payload.len() + self.terminator.len());
        wire.put_slice(&frame.payload);
        wire.put_slice(&self.terminator);
        Ok(wire.freeze())
    }

    fn feed(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buf.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(at) = self.find_terminator() {
            let payload = self.buf.split_to(at).freeze();
            self.buf.advance(self.terminator.len());
            frames.push(Frame::new(payload));
        }

        // A peer that never sends a terminator must not buffer us to death.
        if self.buf.len() > self.max_payload {
            return Err(FrameError::PayloadTooLarge {
                size: self.buf.len(),
                max: self.max_payload,
            });
        }

        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(frames: &[Frame]) -> Vec<&[u8]> {
        frames.iter().map(|frame| frame.payload.as_ref()).collect()
    }

    #[test]
    fn frame_appends_terminator() {
        let framer = DelimitedFramer::new();
        let wire = framer.frame(&Frame::new(&b"abc"[..])).unwrap();
        assert_eq!(wire.as_ref(), b"abc\n");
    }

    #[test]
    fn feed_splits_on_terminator() {
        let mut framer = DelimitedFramer::new();
        let frames = framer.feed(b"abc\ndef\n").unwrap();
        assert_eq!(payloads(&frames), vec![&b"abc"[..], &b"def"[..]]);
    }

    #[test]
    fn separate_feeds_yield_same_frames() {
        let mut framer = DelimitedFramer::new();
        let first = framer.feed(b"abc\n").unwrap();
        let second = framer.feed(b"def\n").unwrap();
        assert_eq!(payloads(&first), vec![&b"abc"[..]]);
        assert_eq!(payloads(&second), vec![&b"def"[..]]);
    }

    #[test]
    fn partial_frame_is_retained() {
        let mut framer = DelimitedFramer::new();
        assert!(framer.feed(b"ab").unwrap().is_empty());
        assert!(framer.feed(b"c").unwrap().is_empty());
        let frames = framer.feed(b"\n").unwrap();
        assert_eq!(payloads(&frames), vec![&b"abc"[..]]);
    }

    #[test]
    fn byte_at_a_time_matches_single_feed() {
        let wire = b"first\nsecond\nthird\n";

        let mut all_at_once = DelimitedFramer::new();
        let expected = all_at_once.feed(wire).unwrap();

        let mut byte_wise = DelimitedFramer::new();
        let mut collected = Vec::new();
        for byte in wire {
            collected.extend(byte_wise.feed(std::slice::from_ref(byte)).unwrap());
        }

        assert_eq!(collected, expected);
    }

    #[test]
    fn multi_byte_terminator() {
        let mut framer = DelimitedFramer::with_terminator(b"\r\n");
        let frames = framer.feed(b"one\r\ntwo\r\n").unwrap();
        assert_eq!(payloads(&frames), vec![&b"one"[..], &b"two"[..]]);

        // Terminator split across feeds.
        let mut framer = DelimitedFramer::with_terminator(b"\r\n");
        assert!(framer.feed(b"one\r").unwrap().is_empty());
        let frames = framer.feed(b"\n").unwrap();
        assert_eq!(payloads(&frames), vec![&b"one"[..]]);
    }

    #[test]
    fn empty_frame_between_terminators() {
        let mut framer = DelimitedFramer::new();
        let frames = framer.feed(b"a\n\nb\n").unwrap();
        assert_eq!(payloads(&frames), vec![&b"a"[..], &b""[..], &b"b"[..]]);
    }

    #[test]
    fn unbounded_buffering_is_refused() {
        let mut framer = DelimitedFramer::new().with_max_payload(8);
        let err = framer.feed(b"way more than eight bytes").unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }
}
