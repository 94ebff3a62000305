/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A length prefix was not exactly `LENGTH_PREFIX_SIZE` bytes.
    #[error("malformed length prefix ({got} bytes, expected {expected})")]
    MalformedLength { got: usize, expected: usize },

    /// The peer closed the connection part way through the length prefix.
    #[error("truncated length prefix ({got} of {expected} bytes received)")]
    TruncatedLength { got: usize, expected: usize },

    /// The length prefix decoded to a negative size.
    #[error("negative payload length {0}")]
    NegativeLength(isize),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
