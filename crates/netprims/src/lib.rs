//! Framing, content-type envelopes and message-queue RPC for networked
//! services.
//!
//! netprims provides the communication primitives a distributed service
//! needs above the socket and below the application: stream framing,
//! content-type and compression envelopes, and correlation-id request/reply
//! over a message broker.
//!
//! # Crate Structure
//!
//! - [`transport`] — Byte-stream connection abstraction
//! - [`codec`] — Serializer/compressor registries and the envelope pipeline
//! - [`frame`] — Delimiter, netstring and type-tagged length-prefix framing
//! - [`endpoint`] — Framed stream endpoints carrying structured values
//! - [`mq`] — Broker endpoints and correlation-id RPC (behind `mq` feature)

/// Re-export transport types.
pub mod transport {
    pub use netprims_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use netprims_codec::*;
}

/// Re-export frame types.
pub mod frame {
    pub use netprims_frame::*;
}

/// Re-export endpoint types.
pub mod endpoint {
    pub use netprims_endpoint::*;
}

/// Re-export message-queue types (requires `mq` feature).
#[cfg(feature = "mq")]
pub mod mq {
    pub use netprims_mq::*;
}
