use std::fmt;
use std::path::PathBuf;

/// Name multipathd listens on, in the Linux abstract socket namespace.
pub const MULTIPATHD_SOCKET: &str = "/org/kernel/linux/storage/multipathd";

/// Where a Unix domain socket lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SocketAddress {
    /// Linux abstract namespace name, without the leading NUL.
    Abstract(String),
    /// Filesystem socket path.
    Path(PathBuf),
}

impl SocketAddress {
    /// The well-known multipathd control socket.
    pub fn multipathd() -> Self {
        Self::Abstract(MULTIPATHD_SOCKET.to_string())
    }

    /// Raw name bytes as they go into `sun_path` (without any NUL).
    pub fn name_bytes(&self) -> &[u8] {
        match self {
            Self::Abstract(name) => name.as_bytes(),
            #[cfg(unix)]
            Self::Path(path) => {
                use std::os::unix::ffi::OsStrExt;
                path.as_os_str().as_bytes()
            }
            #[cfg(not(unix))]
            Self::Path(path) => path.to_str().map(str::as_bytes).unwrap_or_default(),
        }
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Abstract(_))
    }
}

impl Default for SocketAddress {
    fn default() -> Self {
        Self::multipathd()
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abstract(name) => write!(f, "@{name}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<PathBuf> for SocketAddress {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}
