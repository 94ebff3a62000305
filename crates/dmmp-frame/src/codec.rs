use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Width of the length prefix: the platform's `ssize_t`.
pub const LENGTH_PREFIX_SIZE: usize = std::mem::size_of::<isize>();

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Encode a payload length as a native-endian `ssize_t`.
///
/// multipathd reads the prefix straight into an `ssize_t`, so width and byte
/// order must match the host exactly.
pub fn encode_length(len: usize) -> Result<[u8; LENGTH_PREFIX_SIZE]> {
    let len = isize::try_from(len).map_err(|_| FrameError::PayloadTooLarge {
        size: len,
        max: isize::MAX as usize,
    })?;
    Ok(len.to_ne_bytes())
}

/// Decode a native-endian `ssize_t` length prefix.
pub fn decode_length(bytes: &[u8]) -> Result<usize> {
    let raw = <[u8; LENGTH_PREFIX_SIZE]>::try_from(bytes);
    let raw = raw.map_err(|_| FrameError::MalformedLength {
        got: bytes.len(),
        expected: LENGTH_PREFIX_SIZE,
    })?;
    let len = isize::from_ne_bytes(raw);
    usize::try_from(len).map_err(|_| FrameError::NegativeLength(len))
}

/// Encode a command into the request wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────────────┬──────────────────┬──────┐
/// │ Length (ssize_t, NE) │ Command bytes    │ 0x00 │
/// │ = command len + 1    │                  │      │
/// └──────────────────────┴──────────────────┴──────┘
/// ```
pub fn encode_request(command: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = command
        .len()
        .checked_add(1)
        .ok_or(FrameError::PayloadTooLarge {
            size: command.len(),
            max: isize::MAX as usize,
        })?;
    let prefix = encode_length(len)?;

    dst.reserve(LENGTH_PREFIX_SIZE + len);
    dst.put_slice(&prefix);
    dst.put_slice(command);
    dst.put_u8(0);
    Ok(())
}

/// Decode one frame payload from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    if src.len() < LENGTH_PREFIX_SIZE {
        return Ok(None);
    }

    let payload_len = decode_length(&src[..LENGTH_PREFIX_SIZE])?;
    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    if src.len() - LENGTH_PREFIX_SIZE < payload_len {
        return Ok(None);
    }

    src.advance(LENGTH_PREFIX_SIZE);
    Ok(Some(src.split_to(payload_len).freeze()))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
