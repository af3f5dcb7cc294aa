//! Serializer registry.
//!
//! Maps a [`ContentType`] to an encode/decode pair for [`Value`]s. The
//! registry is populated at startup; registration is last-wins so an
//! application can replace a built-in.

use std::collections::HashMap;

use bytes::Bytes;
use serde_json::Value;

use crate::error::{CodecError, Result};
use crate::ident::ContentType;

/// An encode/decode pair for one content type.
pub trait Serializer: Send + Sync {
    /// Serialize a value into payload bytes.
    fn encode(&self, value: &Value) -> Result<Bytes>;

    /// Deserialize payload bytes back into a value.
    fn decode(&self, data: &[u8]) -> Result<Value>;
}

/// Content-type keyed registry of serializers.
#[derive(Default)]
pub struct SerializerRegistry {
    entries: HashMap<ContentType, Box<dyn Serializer>>,
}

impl SerializerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in serializer registered.
    ///
    /// Text and JSON are always present; MsgPack and YAML are included when
    /// the corresponding feature is enabled. `RAW`, `PROTOBUF` and `AVRO`
    /// are reserved identifiers with no built-in implementation; those
    /// formats carry types the neutral value cannot express and must be
    /// registered by the application.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ContentType::TEXT, Box::new(TextSerializer));
        registry.register(ContentType::JSON, Box::new(JsonSerializer));
        #[cfg(feature = "msgpack")]
        registry.register(ContentType::MSGPACK, Box::new(MsgpackSerializer));
        #[cfg(feature = "yaml")]
        registry.register(ContentType::YAML, Box::new(YamlSerializer));
        registry
    }

    /// Register a serializer. The last registration for an identifier wins.
    pub fn register(&mut self, content_type: ContentType, serializer: Box<dyn Serializer>) {
        self.entries.insert(content_type, serializer);
    }

    /// Returns true if a serializer is registered for this content type.
    pub fn contains(&self, content_type: ContentType) -> bool {
        self.entries.contains_key(&content_type)
    }

    /// Encode a value with the named serializer.
    pub fn encode(&self, content_type: ContentType, value: &Value) -> Result<Bytes> {
        self.entries
            .get(&content_type)
            .ok_or(CodecError::UnknownContentType(content_type))?
            .encode(value)
    }

    /// Decode payload bytes with the named serializer.
    pub fn decode(&self, content_type: ContentType, data: &[u8]) -> Result<Value> {
        self.entries
            .get(&content_type)
            .ok_or(CodecError::UnknownContentType(content_type))?
            .decode(data)
    }
}

/// UTF-8 plain text. Encodes only `Value::String`.
struct TextSerializer;

impl Serializer for TextSerializer {
    fn encode(&self, value: &Value) -> Result<Bytes> {
        match value {
            Value::String(text) => Ok(Bytes::copy_from_slice(text.as_bytes())),
            other => Err(CodecError::Encode(format!(
                "text serializer requires a string value, got {other:?}"
            ))),
        }
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(data)
            .map_err(|err| CodecError::Decode(format!("invalid UTF-8: {err}")))?;
        Ok(Value::String(text.to_owned()))
    }
}

struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn encode(&self, value: &Value) -> Result<Bytes> {
        let encoded =
            serde_json::to_vec(value).map_err(|err| CodecError::Encode(err.to_string()))?;
        Ok(encoded.into())
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        serde_json::from_slice(data).map_err(|err| CodecError::Decode(err.to_string()))
    }
}

#[cfg(feature = "msgpack")]
struct MsgpackSerializer;

#[cfg(feature = "msgpack")]
impl Serializer for MsgpackSerializer {
    fn encode(&self, value: &Value) -> Result<Bytes> {
        let encoded =
            rmp_serde::to_vec_named(value).map_err(|err| CodecError::Encode(err.to_string()))?;
        Ok(encoded.into())
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        rmp_serde::from_slice(data).map_err(|err| CodecError::Decode(err.to_string()))
    }
}

#[cfg(feature = "yaml")]
struct YamlSerializer;

#[cfg(feature = "yaml")]
impl Serializer for YamlSerializer {
    fn encode(&self, value: &Value) -> Result<Bytes> {
        let encoded =
            serde_yaml::to_string(value).map_err(|err| CodecError::Encode(err.to_string()))?;
        Ok(encoded.into_bytes().into())
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        serde_yaml::from_slice(data).map_err(|err| CodecError::Decode(err.to_string()))
    }
}
