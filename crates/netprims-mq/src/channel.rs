//! The broker-channel boundary.

use std::time::Duration;

use bytes::Bytes;

use netprims_codec::{Compression, ContentType, Envelope};

use crate::correlation::CorrelationId;
use crate::error::Result;

/// Out-of-band message attributes carried by the broker alongside the body.
///
/// This is where envelope metadata travels on header-capable transports:
/// content type, compression and correlation id ride here instead of inside
/// the payload.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    pub content_type: Option<ContentType>,
    pub compression: Option<Compression>,
    pub correlation_id: Option<CorrelationId>,
    /// Queue name the receiver should address its response to.
    pub reply_to: Option<String>,
    /// How long the message may sit in a queue before the broker may expire
    /// it server-side.
    pub expiration: Option<Duration>,
    /// Application-level failure indicator on a response. When set, the body
    /// is absent or meaningless.
    pub error: Option<String>,
}

impl Properties {
    /// Rebuild an envelope from a message body, falling back to the given
    /// defaults for attributes the sender did not stamp.
    pub fn envelope(&self, body: Bytes, content_type: ContentType, compression: Compression) -> Envelope {
        Envelope {
            content_type: self.content_type.unwrap_or(content_type),
            compression: self.compression.unwrap_or(compression),
            payload: body,
        }
    }
}

/// A message on its way to the broker.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub routing_key: String,
    pub properties: Properties,
    pub body: Bytes,
}

/// A message delivered by the broker.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub routing_key: String,
    pub properties: Properties,
    pub body: Bytes,
}

/// The external broker channel collaborator.
///
/// Implementations own the connection to the broker. They must hand inbound
/// [`Delivery`] values to the consuming component (`Consumer::decode`,
/// `Requester::handle_response`, `Responder::dispatch`) and report connection
/// loss to `Requester::connection_lost` exactly once per connection lifetime.
#[async_trait::async_trait(?Send)]
pub trait MqChannel {
    /// Publish one message.
    async fn publish(&self, message: OutboundMessage) -> Result<()>;
}
