//! Query multipath devices from multipathd.
//!
//! multipathd owns the live state of every dm-multipath map. This crate asks
//! it for that state over its control socket and hands back an immutable
//! object graph: [`MPath`] → [`PathGroup`] → [`Path`].
//!
//! ```no_run
//! for mpath in dmmp::mpaths_get()? {
//!     let mpath = mpath?;
//!     println!("{} ({})", mpath.name(), mpath.wwid());
//!     for path in mpath.paths() {
//!         println!("  {path}");
//!     }
//! }
//! # Ok::<(), dmmp::DmmpError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`transport`]: Unix domain socket connect (abstract namespace aware)
//! - [`frame`]: Native `ssize_t` length-prefixed framing
//! - [`session`]: One command, one reply, one connection
//! - [`status`], [`model`], [`query`]: the multipathd JSON API

pub mod config;
pub mod error;
pub mod model;
pub mod query;
#[cfg(unix)]
pub mod session;
pub mod status;

pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{DmmpError, Result};
pub use model::{MPath, Path, PathGroup};
#[cfg(unix)]
pub use query::mpaths_get;
pub use query::{parse_mpaths, Client, MPaths, API_VERSION_MAJOR, SHOW_MAPS_JSON};
pub use status::{PathGroupStatus, PathStatus};

/// Re-export transport types.
pub mod transport {
    pub use dmmp_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use dmmp_frame::*;
}
