//! The envelope pipeline.
//!
//! Composes one serializer lookup and one compressor lookup into a single
//! `pack`/`unpack` operation. `unpack` runs the inverse transforms in the
//! inverse order: decompress first, decode second.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;
use tracing::trace;

use crate::compressor::CompressorRegistry;
use crate::error::Result;
use crate::ident::{Compression, ContentType};
use crate::serializer::SerializerRegistry;

/// A payload plus the identifiers needed to decode it.
///
/// Envelopes are transient: created by [`Pipeline::pack`] just before a send
/// and discarded right after [`Pipeline::unpack`] on the receive side. They
/// are never persisted.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub content_type: ContentType,
    pub compression: Compression,
    pub payload: Bytes,
}

impl Envelope {
    pub fn new(content_type: ContentType, compression: Compression, payload: impl Into<Bytes>) -> Self {
        Self {
            content_type,
            compression,
            payload: payload.into(),
        }
    }
}

/// Frozen serializer and compressor registries.
///
/// Cloning is cheap (both registries sit behind `Arc`s), so one pipeline can
/// be shared across every endpoint in a process without synchronization;
/// the registries are read-only once the pipeline is built.
#[derive(Clone)]
pub struct Pipeline {
    serializers: Arc<SerializerRegistry>,
    compressors: Arc<CompressorRegistry>,
}

impl Pipeline {
    /// Freeze the given registries into a pipeline.
    pub fn new(serializers: SerializerRegistry, compressors: CompressorRegistry) -> Self {
        Self {
            serializers: Arc::new(serializers),
            compressors: Arc::new(compressors),
        }
    }

    /// A pipeline over the built-in registries.
    pub fn with_defaults() -> Self {
        Self::new(
            SerializerRegistry::with_defaults(),
            CompressorRegistry::with_defaults(),
        )
    }

    /// Serialize then compress a value into an envelope.
    ///
    /// The input value is never mutated.
    pub fn pack(
        &self,
        value: &Value,
        content_type: ContentType,
        compression: Compression,
    ) -> Result<Envelope> {
        let encoded = self.serializers.encode(content_type, value)?;
        let payload = self.compressors.compress(compression, &encoded)?;
        trace!(%content_type, %compression, bytes = payload.len(), "packed envelope");
        Ok(Envelope {
            content_type,
            compression,
            payload,
        })
    }

    /// Decompress then decode an envelope back into a value.
    pub fn unpack(&self, envelope: &Envelope) -> Result<Value> {
        let decompressed = self
            .compressors
            .decompress(envelope.compression, &envelope.payload)?;
        self.serializers.decode(envelope.content_type, &decompressed)
    }

    /// Returns true if both identifiers resolve in this pipeline.
    pub fn supports(&self, content_type: ContentType, compression: Compression) -> bool {
        self.serializers.contains(content_type) && self.compressors.contains(compression)
    }
}
