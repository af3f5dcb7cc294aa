use serde_json::Value;
use tracing::debug;

use netprims_codec::{Compression, ContentType, Pipeline};

use crate::channel::{MqChannel, OutboundMessage, Properties};
use crate::error::Result;

/// Defaults applied to every published message.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Routing key used by [`Producer::publish`].
    pub routing_key: String,
    pub content_type: ContentType,
    pub compression: Compression,
}

impl ProducerConfig {
    pub fn new(routing_key: impl Into<String>) -> Self {
        Self {
            routing_key: routing_key.into(),
            content_type: ContentType::JSON,
            compression: Compression::NONE,
        }
    }
}

/// Fire-and-forget publisher of structured values.
pub struct Producer<C> {
    channel: C,
    pipeline: Pipeline,
    config: ProducerConfig,
}

impl<C: MqChannel> Producer<C> {
    pub fn new(channel: C, pipeline: Pipeline, config: ProducerConfig) -> Self {
        Self {
            channel,
            pipeline,
            config,
        }
    }

    /// Publish a value to the configured routing key.
    pub async fn publish(&self, value: &Value) -> Result<()> {
        self.publish_to(value, &self.config.routing_key).await
    }

    /// Publish a value to an explicit routing key.
    pub async fn publish_to(&self, value: &Value, routing_key: &str) -> Result<()> {
        let envelope =
            self.pipeline
                .pack(value, self.config.content_type, self.config.compression)?;

        debug!(routing_key, bytes = envelope.payload.len(), "publishing message");
        self.channel
            .publish(OutboundMessage {
                routing_key: routing_key.to_owned(),
                properties: Properties {
                    content_type: Some(envelope.content_type),
                    compression: Some(envelope.compression),
                    ..Properties::default()
                },
                body: envelope.payload,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::error::MqError;

    #[derive(Clone, Default)]
    struct RecordingChannel {
        sent: Rc<RefCell<Vec<OutboundMessage>>>,
    }

    #[async_trait::async_trait(?Send)]
    impl MqChannel for RecordingChannel {
        async fn publish(&self, message: OutboundMessage) -> Result<()> {
            self.sent.borrow_mut().push(message);
            Ok(())
        }
    }

    #[tokio::test]
    async fn publish_stamps_properties() {
        let channel = RecordingChannel::default();
        let producer = Producer::new(
            channel.clone(),
            Pipeline::with_defaults(),
            ProducerConfig::new("telemetry"),
        );

        producer.publish(&json!({"cpu": 0.4})).await.unwrap();

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].routing_key, "telemetry");
        assert_eq!(sent[0].properties.content_type, Some(ContentType::JSON));
        assert_eq!(sent[0].properties.compression, Some(Compression::NONE));
        assert_eq!(sent[0].body.as_ref(), br#"{"cpu":0.4}"#);
    }

    #[tokio::test]
    async fn publish_to_overrides_routing_key() {
        let channel = RecordingChannel::default();
        let producer = Producer::new(
            channel.clone(),
            Pipeline::with_defaults(),
            ProducerConfig::new("default.key"),
        );

        producer
            .publish_to(&json!(1), "other.key")
            .await
            .unwrap();

        assert_eq!(channel.sent.borrow()[0].routing_key, "other.key");
    }

    #[tokio::test]
    async fn pack_failure_is_reported() {
        let channel = RecordingChannel::default();
        let mut config = ProducerConfig::new("k");
        config.content_type = ContentType(999);
        let producer = Producer::new(channel.clone(), Pipeline::with_defaults(), config);

        let err = producer.publish(&json!(1)).await.unwrap_err();
        assert!(matches!(err, MqError::Codec(_)));
        assert!(channel.sent.borrow().is_empty());
    }
}
