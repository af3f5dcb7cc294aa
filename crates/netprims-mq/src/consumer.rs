use serde_json::Value;
use tracing::debug;

use netprims_codec::{CodecError, Compression, ContentType, Pipeline};

use crate::channel::Delivery;

/// Fallback envelope attributes for deliveries whose sender stamped none.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub content_type: ContentType,
    pub compression: Compression,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            content_type: ContentType::JSON,
            compression: Compression::NONE,
        }
    }
}

/// Decodes broker deliveries back into structured values.
///
/// The counterpart of [`Producer`]: envelope attributes come from the
/// delivery's properties, with the configured defaults filling any gaps.
///
/// [`Producer`]: crate::producer::Producer
pub struct Consumer {
    pipeline: Pipeline,
    config: ConsumerConfig,
}

impl Consumer {
    pub fn new(pipeline: Pipeline, config: ConsumerConfig) -> Self {
        Self { pipeline, config }
    }

    /// Decode one delivery.
    pub fn decode(&self, delivery: &Delivery) -> Result<Value, CodecError> {
        let envelope = delivery.properties.envelope(
            delivery.body.clone(),
            self.config.content_type,
            self.config.compression,
        );
        debug!(
            routing_key = delivery.routing_key,
            content_type = %envelope.content_type,
            "decoding delivery"
        );
        self.pipeline.unpack(&envelope)
    }
}
