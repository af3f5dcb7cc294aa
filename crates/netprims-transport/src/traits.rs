use std::io::{ErrorKind, Write};

use tracing::debug;

use crate::error::{Result, TransportError};

/// The write half of a connected transport.
///
/// For stream transports each `write` appends bytes to the stream. For
/// datagram transports each `write` sends exactly one datagram. The
/// implementation must deliver connection-loss notifications to the layer
/// above exactly once per connection lifetime; after that, `write` returns
/// [`TransportError::Closed`].
pub trait Connection {
    /// Write one complete buffer of wire bytes.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Close the connection. Idempotent.
    fn close(&mut self);
}

/// Adapter turning any `std::io::Write` into a [`Connection`].
///
/// Retries on `Interrupted`/`WouldBlock` and treats a zero-length write as a
/// closed connection.
pub struct IoConnection<W> {
    inner: W,
    open: bool,
}

impl<W: Write> IoConnection<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, open: true }
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the adapter and return the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Connection for IoConnection<W> {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        if !self.open {
            return Err(TransportError::Closed);
        }

        let mut offset = 0usize;
        while offset < data.len() {
            match self.inner.write(&data[offset..]) {
                Ok(0) => {
                    self.open = false;
                    return Err(TransportError::Closed);
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn close(&mut self) {
        if self.open {
            debug!("closing connection");
            self.open = false;
        }
    }
}
