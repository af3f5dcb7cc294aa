use std::time::Duration;

use netprims_codec::CodecError;

/// Errors from the broker channel and the publish path.
#[derive(Debug, thiserror::Error)]
pub enum MqError {
    /// The broker refused or failed to accept the message.
    #[error("publish failed: {0}")]
    Publish(String),

    /// The channel is closed.
    #[error("channel closed")]
    Closed,

    /// Envelope failure while preparing or interpreting a message.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, MqError>;

/// Errors surfaced to a [`Requester`] caller.
///
/// [`Requester`]: crate::requester::Requester
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// No response arrived within the deadline. The request may be retried.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection to the broker was lost while the request was pending.
    /// Not retried automatically.
    #[error("connection lost while request pending")]
    ConnectionLost,

    /// The responder handled the request but reported an application-level
    /// failure.
    #[error("service error: {0}")]
    Remote(String),

    /// The request could not be encoded, or the response not decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The request could not be published.
    #[error("channel error: {0}")]
    Channel(#[from] MqError),
}
