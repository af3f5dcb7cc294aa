//! Structured-message encoding for netprims.
//!
//! Applications exchange [`Value`]s, not raw bytes. A value travels through
//! two pluggable registries on the way to the wire: a serializer keyed by
//! [`ContentType`] turns it into bytes, then a compressor keyed by
//! [`Compression`] transforms those bytes. The result plus both identifiers is
//! an [`Envelope`], the unit handed to a framer or a broker channel.
//!
//! Both registries are populated at startup and frozen behind a [`Pipeline`];
//! there is no runtime mutation and lookup is a single hash-map probe.

pub mod compressor;
pub mod envelope;
pub mod error;
pub mod ident;
pub mod serializer;

pub use compressor::{Compressor, CompressorRegistry};
pub use envelope::{Envelope, Pipeline};
pub use error::{CodecError, Result};
pub use ident::{Compression, ContentType};
pub use serializer::{Serializer, SerializerRegistry};

/// The neutral structured value exchanged between applications and the
/// pipeline. Every built-in serializer round-trips this type.
pub use serde_json::Value;
