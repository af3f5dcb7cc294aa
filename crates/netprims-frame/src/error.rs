/// Errors that can occur during framing.
///
/// Any error returned from `feed` means the byte stream can no longer be
/// trusted; the connection must be closed, it cannot be resynchronized.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The declared or supplied payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The byte stream violates the frame format.
    #[error("malformed frame: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, FrameError>;
