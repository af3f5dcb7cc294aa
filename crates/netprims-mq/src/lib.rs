//! Message-queue endpoints for netprims.
//!
//! A broker transport differs from a socket in two ways that shape this
//! crate: messages are already discrete (no framing layer), and the broker
//! carries out-of-band [`Properties`] alongside each body, which is where
//! content-type, compression and correlation metadata travel.
//!
//! On top of plain publish/consume ([`Producer`] / [`Consumer`]) sits the
//! request/reply layer: a [`Requester`] stamps each outgoing request with a
//! fresh correlation id and suspends the caller until the matching response
//! arrives, times out, or the connection is lost; a [`Responder`] dispatches
//! inbound requests to a handler and sends the result back tagged with the
//! original correlation id.
//!
//! The broker connection itself (channel management, queue topology,
//! reconnection) is an external collaborator behind the [`MqChannel`] trait.
//! All components here follow the single-threaded cooperative model: they are
//! driven from one local task set and use no locks.

pub mod channel;
pub mod consumer;
pub mod correlation;
pub mod error;
pub mod producer;
pub mod requester;
pub mod responder;

pub use channel::{Delivery, MqChannel, OutboundMessage, Properties};
pub use consumer::{Consumer, ConsumerConfig};
pub use correlation::CorrelationId;
pub use error::{MqError, Result, RpcError};
pub use producer::{Producer, ProducerConfig};
pub use requester::{RequestOptions, Requester, RequesterConfig};
pub use responder::{HandlerError, RequestHandler, Responder, ResponderConfig};
