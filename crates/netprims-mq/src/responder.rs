//! Response side of the request/reply layer.

use serde_json::Value;
use tracing::{debug, error, warn};

use netprims_codec::{Compression, ContentType, Pipeline};

use crate::channel::{Delivery, MqChannel, OutboundMessage, Properties};
use crate::correlation::CorrelationId;
use crate::error::{MqError, Result};

/// Defaults used when a request does not stamp its own envelope attributes,
/// and when encoding responses.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    pub content_type: ContentType,
    pub compression: Compression,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            content_type: ContentType::JSON,
            compression: Compression::NONE,
        }
    }
}

/// Application-level failure reported by a [`RequestHandler`]. Travels back
/// to the caller in the response's error property.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The application service behind a [`Responder`].
#[async_trait::async_trait(?Send)]
pub trait RequestHandler {
    async fn handle(&mut self, request: Value) -> std::result::Result<Value, HandlerError>;
}

/// Dispatches inbound requests to a handler and publishes each result back to
/// the request's reply queue, tagged with the original correlation id.
pub struct Responder<C> {
    channel: C,
    pipeline: Pipeline,
    config: ResponderConfig,
}

impl<C: MqChannel> Responder<C> {
    pub fn new(channel: C, pipeline: Pipeline, config: ResponderConfig) -> Self {
        Self {
            channel,
            pipeline,
            config,
        }
    }

    /// Handle one inbound request.
    ///
    /// Requests missing a `reply_to` or correlation id cannot be answered and
    /// are logged and dropped. A request body that fails to decode, and a
    /// handler failure, both produce an error response so the caller fails
    /// fast instead of waiting out its deadline. The returned error covers
    /// publish failures only.
    pub async fn dispatch<H: RequestHandler>(
        &self,
        handler: &mut H,
        delivery: Delivery,
    ) -> Result<()> {
        let Some(reply_to) = delivery.properties.reply_to.clone() else {
            warn!("dropping request without reply_to");
            return Ok(());
        };
        let Some(id) = delivery.properties.correlation_id else {
            warn!(reply_to, "dropping request without correlation id");
            return Ok(());
        };

        let envelope = delivery.properties.envelope(
            delivery.body,
            self.config.content_type,
            self.config.compression,
        );
        let request = match self.pipeline.unpack(&envelope) {
            Ok(request) => request,
            Err(err) => {
                warn!(correlation_id = %id, %err, "undecodable request");
                return self.send_error(&reply_to, id, err.to_string()).await;
            }
        };

        debug!(correlation_id = %id, "dispatching request");
        match handler.handle(request).await {
            Ok(response) => self.send_response(&reply_to, id, &response).await,
            Err(err) => {
                error!(correlation_id = %id, %err, "handler failed");
                self.send_error(&reply_to, id, err.to_string()).await
            }
        }
    }

    async fn send_response(
        &self,
        reply_to: &str,
        id: CorrelationId,
        response: &Value,
    ) -> Result<()> {
        let envelope =
            self.pipeline
                .pack(response, self.config.content_type, self.config.compression)?;
        self.channel
            .publish(OutboundMessage {
                routing_key: reply_to.to_owned(),
                properties: Properties {
                    content_type: Some(envelope.content_type),
                    compression: Some(envelope.compression),
                    correlation_id: Some(id),
                    ..Properties::default()
                },
                body: envelope.payload,
            })
            .await
    }

    async fn send_error(
        &self,
        reply_to: &str,
        id: CorrelationId,
        message: String,
    ) -> std::result::Result<(), MqError> {
        self.channel
            .publish(OutboundMessage {
                routing_key: reply_to.to_owned(),
                properties: Properties {
                    correlation_id: Some(id),
                    error: Some(message),
                    ..Properties::default()
                },
                body: bytes::Bytes::new(),
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

    struct Echo;

    #[async_trait::async_trait(?Send)]
    impl RequestHandler for Echo {
        async fn handle(&mut self, request: Value) -> std::result::Result<Value, HandlerError> {
            Ok(json!({ "echo": request }))
        }
    }

    struct Failing;

    #[async_trait::async_trait(?Send)]
    impl RequestHandler for Failing {
        async fn handle(&mut self, _request: Value) -> std::result::Result<Value, HandlerError> {
            Err(HandlerError::new("out of stock"))
        }
    }

    fn request(body: Value, reply_to: Option<&str>, id: Option<CorrelationId>) -> Delivery {
        let payload = Pipeline::with_defaults()
            .pack(&body, ContentType::JSON, Compression::NONE)
            .unwrap()
            .payload;
        Delivery {
            routing_key: "svc".to_owned(),
            properties: Properties {
                content_type: Some(ContentType::JSON),
                compression: Some(Compression::NONE),
                correlation_id: id,
                reply_to: reply_to.map(str::to_owned),
                ..Properties::default()
            },
            body: payload,
        }
    }

    fn responder(channel: RecordingChannel) -> Responder<RecordingChannel> {
        Responder::new(channel, Pipeline::with_defaults(), ResponderConfig::default())
    }

    #[tokio::test]
    async fn response_goes_to_reply_queue_with_same_correlation_id() {
        let channel = RecordingChannel::default();
        let responder = responder(channel.clone());
        let id = CorrelationId::new();

        responder
            .dispatch(&mut Echo, request(json!({"n": 7}), Some("replies.3"), Some(id)))
            .await
            .unwrap();

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].routing_key, "replies.3");
        assert_eq!(sent[0].properties.correlation_id, Some(id));
        assert!(sent[0].properties.error.is_none());
        assert_eq!(sent[0].body.as_ref(), br#"{"echo":{"n":7}}"#);
    }

    #[tokio::test]
    async fn handler_failure_becomes_error_response() {
        let channel = RecordingChannel::default();
        let responder = responder(channel.clone());
        let id = CorrelationId::new();

        responder
            .dispatch(&mut Failing, request(json!(1), Some("replies.3"), Some(id)))
            .await
            .unwrap();

        let sent = channel.sent.borrow();
        assert_eq!(sent[0].properties.error.as_deref(), Some("out of stock"));
        assert_eq!(sent[0].properties.correlation_id, Some(id));
        assert!(sent[0].body.is_empty());
    }

    #[tokio::test]
    async fn undecodable_request_becomes_error_response() {
        let channel = RecordingChannel::default();
        let responder = responder(channel.clone());
        let id = CorrelationId::new();

        let mut delivery = request(json!(1), Some("replies.3"), Some(id));
        delivery.body = bytes::Bytes::from_static(b"{not json");
        responder.dispatch(&mut Echo, delivery).await.unwrap();

        let sent = channel.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].properties.error.is_some());
    }

    #[tokio::test]
    async fn unanswerable_request_is_dropped() {
        let channel = RecordingChannel::default();
        let responder = responder(channel.clone());

        responder
            .dispatch(&mut Echo, request(json!(1), None, Some(CorrelationId::new())))
            .await
            .unwrap();
        responder
            .dispatch(&mut Echo, request(json!(1), Some("replies.3"), None))
            .await
            .unwrap();

        assert!(channel.sent.borrow().is_empty());
    }
}
