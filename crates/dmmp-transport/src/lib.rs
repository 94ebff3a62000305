//! Unix domain socket transport for the multipathd control channel.
//!
//! multipathd listens on an abstract-namespace socket, which the standard
//! library cannot connect to with a timeout. This crate builds the
//! `sockaddr_un` itself and hands back a plain blocking [`IpcStream`].
//!
//! This is the lowest layer of dmmp. Everything else builds on top of
//! the [`IpcStream`] type provided here.

pub mod address;
pub mod error;

#[cfg(unix)]
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use address::{SocketAddress, MULTIPATHD_SOCKET};
pub use error::{Result, TransportError};
#[cfg(unix)]
pub use traits::IpcStream;
#[cfg(unix)]
pub use uds::connect;
