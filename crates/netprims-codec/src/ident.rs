//! Registry identifiers.
//!
//! Identifiers 0-255 are reserved for built-in codecs. Identifiers 256 and
//! above are available for application-defined codecs. The same split applies
//! to both identifier spaces.

use std::fmt;

/// Identifies a serialization strategy in the [`SerializerRegistry`].
///
/// The MTI framer carries this identifier on the wire as its frame type id,
/// so applications registering their own content types should stay at or
/// above [`ContentType::USER_START`].
///
/// [`SerializerRegistry`]: crate::serializer::SerializerRegistry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentType(pub u32);

impl ContentType {
    /// Raw bytes, no serialization. Reserved; no built-in serializer is
    /// shipped for it.
    pub const RAW: Self = Self(0);
    /// UTF-8 plain text.
    pub const TEXT: Self = Self(1);
    /// JSON.
    pub const JSON: Self = Self(2);
    /// MsgPack.
    pub const MSGPACK: Self = Self(3);
    /// YAML.
    pub const YAML: Self = Self(4);
    /// Protocol Buffers. Reserved for application-registered serializers.
    pub const PROTOBUF: Self = Self(5);
    /// Apache Avro. Reserved for application-registered serializers.
    pub const AVRO: Self = Self(6);
    /// First application-defined content type.
    pub const USER_START: Self = Self(256);

    /// Returns true if this identifier is in the reserved range.
    pub fn is_reserved(self) -> bool {
        self.0 < Self::USER_START.0
    }

    /// Returns a human-readable name for this content type.
    pub fn name(self) -> &'static str {
        match self {
            Self::RAW => "raw",
            Self::TEXT => "text",
            Self::JSON => "json",
            Self::MSGPACK => "msgpack",
            Self::YAML => "yaml",
            Self::PROTOBUF => "protobuf",
            Self::AVRO => "avro",
            Self(7..=255) => "reserved",
            _ => "user",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

/// Identifies a compression strategy in the [`CompressorRegistry`].
///
/// [`CompressorRegistry`]: crate::compressor::CompressorRegistry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Compression(pub u32);

impl Compression {
    /// No compression; the identity transform. Always registered.
    pub const NONE: Self = Self(0);
    /// bzip2.
    pub const BZIP2: Self = Self(1);
    /// Snappy.
    pub const SNAPPY: Self = Self(2);
    /// Brotli.
    pub const BROTLI: Self = Self(3);
    /// First application-defined compression identifier.
    pub const USER_START: Self = Self(256);

    /// Returns true if this identifier is in the reserved range.
    pub fn is_reserved(self) -> bool {
        self.0 < Self::USER_START.0
    }

    /// Returns a human-readable name for this compression identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::NONE => "none",
            Self::BZIP2 => "bzip2",
            Self::SNAPPY => "snappy",
            Self::BROTLI => "brotli",
            Self(4..=255) => "reserved",
            _ => "user",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_ranges() {
        assert!(ContentType::JSON.is_reserved());
        assert!(ContentType(255).is_reserved());
        assert!(!ContentType::USER_START.is_reserved());
        assert!(Compression::SNAPPY.is_reserved());
        assert!(!Compression(300).is_reserved());
    }

    #[test]
    fn names() {
        assert_eq!(ContentType::TEXT.name(), "text");
        assert_eq!(ContentType(42).name(), "reserved");
        assert_eq!(ContentType(1000).name(), "user");
        assert_eq!(Compression::NONE.name(), "none");
        assert_eq!(format!("{}", ContentType::JSON), "json(2)");
    }
}
