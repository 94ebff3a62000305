//! Length-prefixed framing for the multipathd control socket.
//!
//! Every message, in both directions, is framed as:
//! - a length prefix in the platform's native `ssize_t` width and byte order
//! - exactly that many payload bytes
//!
//! There is no magic number and no version field. Requests carry the command
//! text plus one trailing NUL, and the prefix counts that NUL.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, decode_length, encode_length, encode_request, FrameConfig, DEFAULT_MAX_PAYLOAD,
    LENGTH_PREFIX_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
