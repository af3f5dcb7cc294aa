use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use netprims_codec::{CodecError, Compression, ContentType, Envelope, Pipeline};
use netprims_frame::{Frame, Framer};
use netprims_transport::Connection;

use crate::error::{EndpointError, Result};

/// Per-endpoint defaults for transports that carry no message metadata.
///
/// Stream and datagram wire formats have nowhere to put content-type or
/// compression identifiers (the MTI header carries the content type, nothing
/// carries the compression), so both peers of a connection must agree on
/// these defaults out of band.
#[derive(Debug, Clone, Copy)]
pub struct EndpointConfig {
    pub content_type: ContentType,
    pub compression: Compression,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            content_type: ContentType::JSON,
            compression: Compression::NONE,
        }
    }
}

/// One inbound frame, after envelope processing.
#[derive(Debug)]
pub enum Received {
    /// A fully decoded application value.
    Message {
        content_type: ContentType,
        compression: Compression,
        value: Value,
    },
    /// A frame that was extracted cleanly but whose content could not be
    /// interpreted. The connection stays open; only this message is lost,
    /// and the caller gets to observe why.
    Rejected {
        content_type: ContentType,
        error: CodecError,
    },
}

/// A message endpoint: one framer, one connection, one pipeline.
///
/// Works for stream and datagram transports alike: feed each received chunk
/// (or each whole datagram) to [`Endpoint::receive`].
pub struct Endpoint<F, C> {
    framer: F,
    conn: C,
    pipeline: Pipeline,
    config: EndpointConfig,
    open: bool,
}

impl<F: Framer, C: Connection> Endpoint<F, C> {
    /// Create an endpoint with default content-type/compression settings.
    pub fn new(framer: F, conn: C, pipeline: Pipeline) -> Self {
        Self::with_config(framer, conn, pipeline, EndpointConfig::default())
    }

    /// Create an endpoint with explicit configuration.
    pub fn with_config(framer: F, conn: C, pipeline: Pipeline, config: EndpointConfig) -> Self {
        Self {
            framer,
            conn,
            pipeline,
            config,
            open: true,
        }
    }

    /// Pack a value with the endpoint defaults and send it.
    pub fn send(&mut self, value: &Value) -> Result<()> {
        self.send_as(value, self.config.content_type, self.config.compression)
    }

    /// Pack a value with explicit identifiers and send it.
    ///
    /// On a non-MTI endpoint the identifiers do not travel on the wire; use
    /// this only when the peer resolves them some other way.
    pub fn send_as(
        &mut self,
        value: &Value,
        content_type: ContentType,
        compression: Compression,
    ) -> Result<()> {
        if !self.open {
            return Err(EndpointError::Closed);
        }

        let envelope = self.pipeline.pack(value, content_type, compression)?;
        self.write_envelope(&envelope)
    }

    /// Send pre-formed payload bytes, skipping the envelope pipeline.
    ///
    /// This is the relay path: the payload is framed as-is, untyped.
    pub fn send_raw(&mut self, payload: &[u8]) -> Result<()> {
        if !self.open {
            return Err(EndpointError::Closed);
        }
        self.write_frame(&Frame::new(Bytes::copy_from_slice(payload)))
    }

    /// Process bytes received from the transport.
    ///
    /// Returns one [`Received`] per complete frame, in arrival order. An
    /// `Err` is a framing or protocol failure: the endpoint closes its
    /// connection before returning because the stream cannot be trusted past
    /// the point of desynchronization.
    pub fn receive(&mut self, data: &[u8]) -> Result<Vec<Received>> {
        if !self.open {
            return Err(EndpointError::Closed);
        }

        let frames = match self.framer.feed(data) {
            Ok(frames) => frames,
            Err(err) => {
                warn!(error = %err, "framing failure, closing connection");
                self.close();
                return Err(err.into());
            }
        };

        let mut received = Vec::with_capacity(frames.len());
        for frame in frames {
            let (content_type, compression) = self.resolve(&frame);
            let envelope = Envelope {
                content_type,
                compression,
                payload: frame.payload,
            };
            match self.pipeline.unpack(&envelope) {
                Ok(value) => {
                    debug!(%content_type, bytes = envelope.payload.len(), "message received");
                    received.push(Received::Message {
                        content_type,
                        compression,
                        value,
                    });
                }
                Err(error) => {
                    warn!(%content_type, %error, "dropping undecodable message");
                    received.push(Received::Rejected {
                        content_type,
                        error,
                    });
                }
            }
        }

        Ok(received)
    }

    /// Resolve identifiers for an inbound frame: the MTI type id when the
    /// frame carries one, the endpoint defaults otherwise.
    fn resolve(&self, frame: &Frame) -> (ContentType, Compression) {
        let content_type = if frame.type_id != 0 {
            ContentType(frame.type_id)
        } else {
            self.config.content_type
        };
        (content_type, self.config.compression)
    }

    fn write_envelope(&mut self, envelope: &Envelope) -> Result<()> {
        self.write_frame(&Frame::typed(
            envelope.content_type.0,
            envelope.payload.clone(),
        ))
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let wire = self.framer.frame(frame)?;
        debug!(bytes = wire.len(), "sending frame");
        if let Err(err) = self.conn.write(&wire) {
            self.close();
            return Err(err.into());
        }
        Ok(())
    }

    /// Whether the endpoint can still send and receive.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close the endpoint and its connection. Idempotent.
    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            self.conn.close();
        }
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Consume the endpoint and return its connection.
    pub fn into_connection(self) -> C {
        self.conn
    }
}
