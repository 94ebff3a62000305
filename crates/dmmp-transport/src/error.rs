use std::time::Duration;

use crate::address::SocketAddress;

/// Errors that can occur in IPC transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the specified address.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: SocketAddress,
        source: std::io::Error,
    },

    /// The connect did not complete within the configured timeout.
    #[error("timed out after {timeout:?} connecting to {address}")]
    Timeout {
        address: SocketAddress,
        timeout: Duration,
    },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection before the exchange completed.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// The socket name does not fit into `sockaddr_un`.
    #[error("socket address too long ({len} bytes, max {max}): {address}")]
    PathTooLong {
        address: SocketAddress,
        len: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, TransportError>;
