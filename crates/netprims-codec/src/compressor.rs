//! Compressor registry.
//!
//! Maps a [`Compression`] identifier to a compress/decompress byte transform.
//! Same lifecycle as the serializer registry: built at startup, last-wins
//! registration, read-only afterwards.

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::{CodecError, Result};
use crate::ident::Compression;

/// A compress/decompress pair for one compression identifier.
pub trait Compressor: Send + Sync {
    /// Compress payload bytes.
    fn compress(&self, data: &[u8]) -> Result<Bytes>;

    /// Decompress payload bytes.
    fn decompress(&self, data: &[u8]) -> Result<Bytes>;
}

/// Identifier-keyed registry of compressors.
#[derive(Default)]
pub struct CompressorRegistry {
    entries: HashMap<Compression, Box<dyn Compressor>>,
}

impl CompressorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in compressor registered.
    ///
    /// The identity transform for [`Compression::NONE`] is always present;
    /// bzip2, snappy and brotli are included when the corresponding feature
    /// is enabled.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Compression::NONE, Box::new(NoneCompressor));
        #[cfg(feature = "bzip2")]
        registry.register(Compression::BZIP2, Box::new(Bzip2Compressor));
        #[cfg(feature = "snappy")]
        registry.register(Compression::SNAPPY, Box::new(SnappyCompressor));
        #[cfg(feature = "brotli")]
        registry.register(Compression::BROTLI, Box::new(BrotliCompressor));
        registry
    }

    /// Register a compressor. The last registration for an identifier wins.
    pub fn register(&mut self, compression: Compression, compressor: Box<dyn Compressor>) {
        self.entries.insert(compression, compressor);
    }

    /// Returns true if a compressor is registered for this identifier.
    pub fn contains(&self, compression: Compression) -> bool {
        self.entries.contains_key(&compression)
    }

    /// Compress bytes with the named strategy.
    pub fn compress(&self, compression: Compression, data: &[u8]) -> Result<Bytes> {
        self.entries
            .get(&compression)
            .ok_or(CodecError::UnknownCompression(compression))?
            .compress(data)
    }

    /// Decompress bytes with the named strategy.
    pub fn decompress(&self, compression: Compression, data: &[u8]) -> Result<Bytes> {
        self.entries
            .get(&compression)
            .ok_or(CodecError::UnknownCompression(compression))?
            .decompress(data)
    }
}

/// The compression you have when you don't want compression.
struct NoneCompressor;

impl Compressor for NoneCompressor {
    fn compress(&self, data: &[u8]) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(data))
    }

    fn decompress(&self, data: &[u8]) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(data))
    }
}

#[cfg(feature = "bzip2")]
struct Bzip2Compressor;

#[cfg(feature = "bzip2")]
impl Compressor for Bzip2Compressor {
    fn compress(&self, data: &[u8]) -> Result<Bytes> {
        use std::io::Read;
        let mut out = Vec::new();
        bzip2::read::BzEncoder::new(data, bzip2::Compression::default())
            .read_to_end(&mut out)
            .map_err(|err| CodecError::Compress(err.to_string()))?;
        Ok(out.into())
    }

    fn decompress(&self, data: &[u8]) -> Result<Bytes> {
        use std::io::Read;
        let mut out = Vec::new();
        bzip2::read::BzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|err| CodecError::Decompress(err.to_string()))?;
        Ok(out.into())
    }
}

#[cfg(feature = "snappy")]
struct SnappyCompressor;

#[cfg(feature = "snappy")]
impl Compressor for SnappyCompressor {
    fn compress(&self, data: &[u8]) -> Result<Bytes> {
        snap::raw::Encoder::new()
            .compress_vec(data)
            .map(Into::into)
            .map_err(|err| CodecError::Compress(err.to_string()))
    }

    fn decompress(&self, data: &[u8]) -> Result<Bytes> {
        snap::raw::Decoder::new()
            .decompress_vec(data)
            .map(Into::into)
            .map_err(|err| CodecError::Decompress(err.to_string()))
    }
}

#[cfg(feature = "brotli")]
struct BrotliCompressor;

#[cfg(feature = "brotli")]
impl Compressor for BrotliCompressor {
    fn compress(&self, data: &[u8]) -> Result<Bytes> {
        let mut input = data;
        let mut out = Vec::new();
        let params = brotli::enc::BrotliEncoderParams::default();
        brotli::BrotliCompress(&mut input, &mut out, &params)
            .map_err(|err| CodecError::Compress(err.to_string()))?;
        Ok(out.into())
    }

    fn decompress(&self, data: &[u8]) -> Result<Bytes> {
        let mut input = data;
        let mut out = Vec::new();
        brotli::BrotliDecompress(&mut input, &mut out)
            .map_err(|err| CodecError::Decompress(err.to_string()))?;
        Ok(out.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let registry = CompressorRegistry::with_defaults();
        let data = b"the same bytes out as in";

        let compressed = registry.compress(Compression::NONE, data).unwrap();
        assert_eq!(compressed.as_ref(), data);
        let restored = registry.decompress(Compression::NONE, &compressed).unwrap();
        assert_eq!(restored.as_ref(), data);
    }

    #[test]
    fn unknown_compression() {
        let registry = CompressorRegistry::with_defaults();
        let err = registry.compress(Compression(777), b"x").unwrap_err();
        assert!(matches!(err, CodecError::UnknownCompression(Compression(777))));
    }

    #[cfg(feature = "bzip2")]
    #[test]
    fn bzip2_round_trip() {
        let registry = CompressorRegistry::with_defaults();
        let data = vec![0x5au8; 4096];

        let compressed = registry.compress(Compression::BZIP2, &data).unwrap();
        assert!(compressed.len() < data.len());
        let restored = registry.decompress(Compression::BZIP2, &compressed).unwrap();
        assert_eq!(restored.as_ref(), data.as_slice());
    }

    #[cfg(feature = "bzip2")]
    #[test]
    fn bzip2_rejects_garbage() {
        let registry = CompressorRegistry::with_defaults();
        let err = registry
            .decompress(Compression::BZIP2, b"not bzip2 data")
            .unwrap_err();
        assert!(matches!(err, CodecError::Decompress(_)));
    }

    #[cfg(feature = "snappy")]
    #[test]
    fn snappy_round_trip() {
        let registry = CompressorRegistry::with_defaults();
        let data = b"snappy snappy snappy snappy snappy".repeat(16);

        let compressed = registry.compress(Compression::SNAPPY, &data).unwrap();
        let restored = registry
            .decompress(Compression::SNAPPY, &compressed)
            .unwrap();
        assert_eq!(restored.as_ref(), data.as_slice());
    }

    #[cfg(feature = "brotli")]
    #[test]
    fn brotli_round_trip() {
        let registry = CompressorRegistry::with_defaults();
        let data = b"brotli brotli brotli brotli".repeat(32);

        let compressed = registry.compress(Compression::BROTLI, &data).unwrap();
        let restored = registry
            .decompress(Compression::BROTLI, &compressed)
            .unwrap();
        assert_eq!(restored.as_ref(), data.as_slice());
    }
}
