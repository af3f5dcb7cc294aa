/// Errors that can occur in endpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// Frame-level error. Fatal: the byte stream cannot be resynchronized,
    /// so the endpoint closes its connection before surfacing this.
    #[error("frame error: {0}")]
    Frame(#[from] netprims_frame::FrameError),

    /// Transport-level error while writing.
    #[error("transport error: {0}")]
    Transport(#[from] netprims_transport::TransportError),

    /// Send-side envelope failure (unknown identifier or encode failure).
    /// Recoverable: the connection stays open.
    #[error("codec error: {0}")]
    Codec(#[from] netprims_codec::CodecError),

    /// The endpoint has been closed.
    #[error("endpoint closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, EndpointError>;
