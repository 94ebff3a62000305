use std::time::Duration;

use dmmp_frame::{FrameConfig, DEFAULT_MAX_PAYLOAD};
use dmmp_transport::SocketAddress;

use crate::error::{DmmpError, Result};

/// Connect and receive timeout multipathd clients use by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a multipathd query.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Socket multipathd listens on. Default: the abstract
    /// `/org/kernel/linux/storage/multipathd` socket.
    pub address: SocketAddress,
    /// Bound on connecting, sending and waiting for the reply. Must be non-zero.
    pub timeout: Duration,
    /// Largest reply accepted, in bytes. Default: 16 MiB.
    pub max_response_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: SocketAddress::multipathd(),
            timeout: DEFAULT_TIMEOUT,
            max_response_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

impl ClientConfig {
    pub fn with_address(mut self, address: impl Into<SocketAddress>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_size(mut self, max_response_size: usize) -> Self {
        self.max_response_size = max_response_size;
        self
    }

    /// Reject settings the socket layer cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(DmmpError::InvalidConfig("timeout must be non-zero"));
        }
        Ok(())
    }

    pub(crate) fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            max_payload_size: self.max_response_size,
            read_timeout: Some(self.timeout),
            write_timeout: Some(self.timeout),
        }
    }
}
