//! Message framing for netprims.
//!
//! A framer turns an unbounded byte stream (or a sequence of datagrams) into
//! discrete payloads and back. Three interchangeable variants share the
//! [`Framer`] contract:
//!
//! - [`DelimitedFramer`] — payloads separated by a terminator byte sequence
//!   (default `\n`). Unsafe for payloads that may contain the terminator.
//! - [`NetstringFramer`] — ASCII length prefix: `<len>:<payload>,`.
//! - [`MtiFramer`] — fixed binary header carrying a message type identifier
//!   and payload length.
//!
//! Only netstring and MTI are safe for arbitrary binary payloads.
//!
//! Every variant retains partial bytes between [`Framer::feed`] calls, so
//! feeding a byte stream in arbitrary chunks yields the same frame sequence
//! as feeding it all at once.

pub mod delimited;
pub mod error;
pub mod frame;
pub mod mti;
pub mod netstring;

pub use delimited::DelimitedFramer;
pub use error::{FrameError, Result};
pub use frame::{Frame, Framer, DEFAULT_MAX_PAYLOAD};
pub use mti::{MtiFramer, MTI_HEADER_SIZE};
pub use netstring::NetstringFramer;
