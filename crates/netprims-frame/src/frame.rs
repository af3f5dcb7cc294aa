use bytes::Bytes;

use crate::error::Result;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// One payload extracted from, or destined for, the wire.
///
/// `type_id` is only meaningful for the MTI framer, which carries it in the
/// frame header so the endpoint can resolve a content type without touching
/// the payload. The other variants leave it at 0 ("untyped").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier. 0 means untyped.
    pub type_id: u32,
    /// The payload bytes, without any frame overhead.
    pub payload: Bytes,
}

impl Frame {
    /// Create an untyped frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            type_id: 0,
            payload: payload.into(),
        }
    }

    /// Create a frame carrying a message type identifier.
    pub fn typed(type_id: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            type_id,
            payload: payload.into(),
        }
    }
}

/// The contract shared by every framer variant.
///
/// The defining correctness property is chunk invariance: for any byte
/// sequence and any way of splitting it into chunks, feeding the chunks
/// sequentially yields the same ordered frame sequence as feeding the
/// concatenation in one call. Excess bytes after the last complete frame are
/// retained inside the framer until the next `feed`.
pub trait Framer {
    /// Wrap one frame into its wire representation.
    fn frame(&self, frame: &Frame) -> Result<Bytes>;

    /// Consume received bytes and extract zero or more complete frames,
    /// in the order their bytes arrived.
    fn feed(&mut self, data: &[u8]) -> Result<Vec<Frame>>;
}
