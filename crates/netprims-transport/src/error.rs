/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred while writing to the connection.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection is closed; no further writes are possible.
    #[error("connection closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
