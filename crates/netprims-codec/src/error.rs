use crate::ident::{Compression, ContentType};

/// Errors that can occur while encoding or decoding envelopes.
///
/// The unknown-identifier variants signal a configuration mismatch between
/// peers; the rest signal bad or unrepresentable data. All of them are
/// recoverable per-message: an envelope that fails to decode does not affect
/// other in-flight envelopes.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// No serializer is registered for this content type.
    #[error("unknown content type {0}")]
    UnknownContentType(ContentType),

    /// No compressor is registered for this compression identifier.
    #[error("unknown compression {0}")]
    UnknownCompression(Compression),

    /// The serializer rejected the value.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The payload could not be decoded back into a value.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The compressor rejected the payload.
    #[error("compress failed: {0}")]
    Compress(String),

    /// The payload could not be decompressed.
    #[error("decompress failed: {0}")]
    Decompress(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
