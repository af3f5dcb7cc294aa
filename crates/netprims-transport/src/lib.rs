//! Transport boundary for netprims endpoints.
//!
//! The concrete socket layer (TCP/UDP connect, listen, broker channels) lives
//! outside this workspace. An endpoint only needs a write half for outbound
//! wire bytes; inbound bytes are pushed into the endpoint by whatever drives
//! the connection. This crate defines that seam.

pub mod error;
pub mod traits;

pub use error::{Result, TransportError};
pub use traits::{Connection, IoConnection};
