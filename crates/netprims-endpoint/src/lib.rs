//! Message-boundary endpoints.
//!
//! An [`Endpoint`] owns exactly one framer and the write half of one
//! connection. Outbound values run value → serialize → compress → frame →
//! write; inbound bytes run the mirror. The transport that produces inbound
//! bytes and the loop that drives it live outside this crate: whatever reads
//! the socket simply pushes byte chunks into [`Endpoint::receive`].

pub mod endpoint;
pub mod error;

pub use endpoint::{Endpoint, EndpointConfig, Received};
pub use error::{EndpointError, Result};
