//! Request side of the request/reply layer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use netprims_codec::{Compression, ContentType, Pipeline};

use crate::channel::{Delivery, MqChannel, OutboundMessage, Properties};
use crate::correlation::CorrelationId;
use crate::error::RpcError;

/// Defaults applied to every request.
#[derive(Debug, Clone)]
pub struct RequesterConfig {
    /// Routing key of the service being called.
    pub service: String,
    /// Queue name responses come back on. Stamped into every request's
    /// `reply_to` property.
    pub reply_to: String,
    pub content_type: ContentType,
    pub compression: Compression,
    pub default_timeout: Duration,
}

impl RequesterConfig {
    pub fn new(service: impl Into<String>, reply_to: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            reply_to: reply_to.into(),
            content_type: ContentType::JSON,
            compression: Compression::NONE,
            default_timeout: Duration::from_secs(60),
        }
    }
}

/// Per-call overrides for [`Requester::request_with`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    /// Target a different service than the configured one.
    pub service: Option<String>,
    pub content_type: Option<ContentType>,
    pub compression: Option<Compression>,
}

type PendingMap = RefCell<HashMap<CorrelationId, oneshot::Sender<Result<Value, RpcError>>>>;

/// Sends requests and suspends each caller until the matching response
/// arrives, the deadline passes, or the connection drops.
///
/// Responses are matched to callers by correlation id, so they may arrive in
/// any order relative to the requests. Single-threaded: the pending table is
/// a plain `RefCell`, never borrowed across an await point.
pub struct Requester<C> {
    channel: C,
    pipeline: Pipeline,
    config: RequesterConfig,
    pending: PendingMap,
}

/// Removes the pending entry when a caller stops waiting for any reason,
/// including cancellation of the `request` future itself.
struct PendingGuard<'a> {
    pending: &'a PendingMap,
    id: CorrelationId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.borrow_mut().remove(&self.id);
    }
}

impl<C: MqChannel> Requester<C> {
    pub fn new(channel: C, pipeline: Pipeline, config: RequesterConfig) -> Self {
        Self {
            channel,
            pipeline,
            config,
            pending: RefCell::new(HashMap::new()),
        }
    }

    /// Send a request with the configured defaults and wait for its response.
    pub async fn request(&self, request: &Value) -> Result<Value, RpcError> {
        self.request_with(request, RequestOptions::default()).await
    }

    /// Send a request with per-call overrides and wait for its response.
    pub async fn request_with(
        &self,
        request: &Value,
        options: RequestOptions,
    ) -> Result<Value, RpcError> {
        let timeout = options.timeout.unwrap_or(self.config.default_timeout);
        let service = options.service.as_deref().unwrap_or(&self.config.service);
        let content_type = options.content_type.unwrap_or(self.config.content_type);
        let compression = options.compression.unwrap_or(self.config.compression);

        let envelope = self.pipeline.pack(request, content_type, compression)?;

        let id = CorrelationId::new();
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(id, tx);
        let _guard = PendingGuard {
            pending: &self.pending,
            id,
        };

        debug!(correlation_id = %id, service, "sending request");
        self.channel
            .publish(OutboundMessage {
                routing_key: service.to_owned(),
                properties: Properties {
                    content_type: Some(envelope.content_type),
                    compression: Some(envelope.compression),
                    correlation_id: Some(id),
                    reply_to: Some(self.config.reply_to.clone()),
                    expiration: Some(timeout),
                    error: None,
                },
                body: envelope.payload,
            })
            .await?;

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            // Sender dropped without resolving: the pending table was torn
            // down underneath us.
            Ok(Err(_)) => Err(RpcError::ConnectionLost),
            Err(_) => Err(RpcError::Timeout(timeout)),
        }
    }

    /// Resolve the pending request matching this response, if any.
    ///
    /// Responses carrying an unknown correlation id (late arrivals after a
    /// timeout, or duplicates) are logged and dropped.
    pub fn handle_response(&self, delivery: Delivery) {
        let Some(id) = delivery.properties.correlation_id else {
            warn!("dropping response without correlation id");
            return;
        };
        let Some(tx) = self.pending.borrow_mut().remove(&id) else {
            warn!(correlation_id = %id, "dropping unmatched response");
            return;
        };

        let result = if let Some(message) = delivery.properties.error {
            Err(RpcError::Remote(message))
        } else {
            let envelope = delivery.properties.envelope(
                delivery.body,
                self.config.content_type,
                self.config.compression,
            );
            self.pipeline.unpack(&envelope).map_err(RpcError::from)
        };
        // The caller may have gone away between the remove and the send.
        let _ = tx.send(result);
    }

    /// Fail every pending request. Call once per connection loss; a repeat
    /// call on an already-drained table is a no-op.
    pub fn connection_lost(&self) {
        let drained: Vec<_> = self.pending.borrow_mut().drain().collect();
        if !drained.is_empty() {
            warn!(count = drained.len(), "failing pending requests, connection lost");
        }
        for (_, tx) in drained {
            let _ = tx.send(Err(RpcError::ConnectionLost));
        }
    }

    /// Number of requests currently awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}
