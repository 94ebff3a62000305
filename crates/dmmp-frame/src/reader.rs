use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
#[cfg(unix)]
use dmmp_transport::IpcStream;
use tracing::trace;

use crate::codec::{decode_frame, FrameConfig, LENGTH_PREFIX_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete payloads.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame payload (blocking).
    ///
    /// Returns `Ok(None)` when the peer closes before sending any byte of a
    /// length prefix. EOF inside the prefix is `TruncatedLength`; EOF inside
    /// the payload is `ConnectionClosed`.
    pub fn read_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(payload) = decode_frame(&mut self.buf, self.config.max_payload_size)? {
                trace!(len = payload.len(), "received frame");
                return Ok(Some(payload));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return match self.buf.len() {
                    0 => Ok(None),
                    got if got < LENGTH_PREFIX_SIZE => Err(FrameError::TruncatedLength {
                        got,
                        expected: LENGTH_PREFIX_SIZE,
                    }),
                    _ => Err(FrameError::ConnectionClosed),
                };
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(unix)]
impl FrameReader<IpcStream> {
    /// Create a frame reader for `IpcStream` and apply read timeout from config.
    pub fn with_config_ipc(inner: IpcStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

#[cfg(unix)]
pub(crate) fn transport_to_frame_error(err: dmmp_transport::TransportError) -> FrameError {
    match err {
        dmmp_transport::TransportError::Io(io)
        | dmmp_transport::TransportError::Connect { source: io, .. } => FrameError::Io(io),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
