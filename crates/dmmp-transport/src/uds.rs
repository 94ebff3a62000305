use std::io::ErrorKind;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::net::UnixStream;
use std::time::Duration;

use tracing::debug;

use crate::address::SocketAddress;
use crate::error::{Result, TransportError};
use crate::traits::IpcStream;

/// Connect to a listening Unix domain socket (blocking).
///
/// `timeout` bounds the connect itself and stays applied as the write
/// timeout of the returned stream. `None` blocks indefinitely.
///
/// Abstract-namespace addresses are only supported on Linux.
pub fn connect(address: &SocketAddress, timeout: Option<Duration>) -> Result<IpcStream> {
    let (sun, len) = sockaddr_un(address)?;
    let stream = unconnected_stream().map_err(|e| connect_error(address, e))?;
    // Linux bounds a blocking AF_UNIX connect by the socket send timeout.
    stream
        .set_write_timeout(timeout)
        .map_err(|e| connect_error(address, e))?;

    // SAFETY: `sun` is a fully initialized sockaddr_un, `len` does not exceed its
    // size, and the descriptor is an open AF_UNIX stream socket owned by `stream`.
    let rc = unsafe {
        libc::connect(
            stream.as_raw_fd(),
            (&sun as *const libc::sockaddr_un).cast::<libc::sockaddr>(),
            len,
        )
    };

    if rc != 0 {
        let err = std::io::Error::last_os_error();
        return Err(match timeout {
            Some(timeout) if is_timeout(&err) => TransportError::Timeout {
                address: address.clone(),
                timeout,
            },
            _ => connect_error(address, err),
        });
    }

    debug!(%address, "connected to unix domain socket");
    Ok(IpcStream::from_unix(stream))
}

fn unconnected_stream() -> std::io::Result<UnixStream> {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    let kind = libc::SOCK_STREAM | libc::SOCK_CLOEXEC;
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    let kind = libc::SOCK_STREAM;

    // SAFETY: socket(2) with constant arguments has no memory-safety preconditions.
    let fd = unsafe { libc::socket(libc::AF_UNIX, kind, 0) };
    if fd < 0 {
        return Err(std::io::Error::last_os_error());
    }
    // SAFETY: `fd` was just returned by socket(2) and is owned by nothing else.
    let fd = unsafe { OwnedFd::from_raw_fd(fd) };
    Ok(UnixStream::from(fd))
}

fn sockaddr_un(address: &SocketAddress) -> Result<(libc::sockaddr_un, libc::socklen_t)> {
    // SAFETY: sockaddr_un is plain old data; all-zero is a valid value.
    let mut sun: libc::sockaddr_un = unsafe { std::mem::zeroed() };
    sun.sun_family = libc::AF_UNIX as libc::sa_family_t;

    let name = address.name_bytes();
    // Abstract names need a leading NUL, filesystem paths a trailing one.
    let max = sun.sun_path.len() - 1;
    if name.len() > max {
        return Err(TransportError::PathTooLong {
            address: address.clone(),
            len: name.len(),
            max,
        });
    }
    if name.is_empty() {
        return Err(connect_error(
            address,
            std::io::Error::new(ErrorKind::InvalidInput, "empty socket name"),
        ));
    }

    let (start, trailing_nul) = match address {
        SocketAddress::Abstract(_) => {
            if !cfg!(any(target_os = "linux", target_os = "android")) {
                return Err(connect_error(
                    address,
                    std::io::Error::new(
                        ErrorKind::Unsupported,
                        "abstract unix sockets are only available on Linux",
                    ),
                ));
            }
            (1, 0)
        }
        SocketAddress::Path(_) => (0, 1),
    };

    for (dst, src) in sun.sun_path[start..].iter_mut().zip(name) {
        *dst = *src as libc::c_char;
    }

    let len = std::mem::offset_of!(libc::sockaddr_un, sun_path) + start + name.len() + trailing_nul;
    Ok((sun, len as libc::socklen_t))
}

fn is_timeout(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
        || err.raw_os_error() == Some(libc::EINPROGRESS)
}

fn connect_error(address: &SocketAddress, source: std::io::Error) -> TransportError {
    TransportError::Connect {
        address: address.clone(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::os::unix::net::UnixListener;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dmmp-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_connect_path_socket() {
        let dir = temp_dir("uds-path");
        let sock_path = dir.join("test.sock");
        let _ = std::fs::remove_file(&sock_path);
        let listener = UnixListener::bind(&sock_path).unwrap();

        let address = SocketAddress::Path(sock_path.clone());
        let handle = std::thread::spawn(move || {
            let mut client = connect(&address, Some(Duration::from_secs(5))).unwrap();
            client.write_all(b"hello").unwrap();
        });

        let (mut server, _) = listener.accept().unwrap();
        let mut buf = [0u8; 5];
        server.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");

        handle.join().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_connect_missing_path() {
        let dir = temp_dir("uds-missing");
        let address = SocketAddress::Path(dir.join("nobody-home.sock"));

        let err = connect(&address, Some(Duration::from_secs(1))).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connect { ref source, .. } if source.kind() == ErrorKind::NotFound
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_path_too_long() {
        let long_path = "/tmp/".to_string() + &"a".repeat(200) + ".sock";
        let result = connect(&SocketAddress::Path(long_path.into()), None);
        assert!(matches!(result, Err(TransportError::PathTooLong { .. })));

        let result = connect(&SocketAddress::Abstract("b".repeat(108)), None);
        assert!(matches!(result, Err(TransportError::PathTooLong { max: 107, .. })));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = connect(&SocketAddress::Abstract(String::new()), None);
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_connect_abstract_socket() {
        use std::os::linux::net::SocketAddrExt;

        let name = format!("dmmp-transport-test-{}", std::process::id());
        let addr = std::os::unix::net::SocketAddr::from_abstract_name(name.as_bytes()).unwrap();
        let listener = UnixListener::bind_addr(&addr).unwrap();

        let address = SocketAddress::Abstract(name);
        let handle = std::thread::spawn(move || {
            let mut client = connect(&address, Some(Duration::from_secs(5))).unwrap();
            let mut buf = [0u8; 4];
            client.read_exact(&mut buf).unwrap();
            buf
        });

        let (mut server, _) = listener.accept().unwrap();
        server.write_all(b"pong").unwrap();
        assert_eq!(&handle.join().unwrap(), b"pong");
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_connect_abstract_refused() {
        let address = SocketAddress::Abstract(format!(
            "dmmp-transport-nobody-{}",
            std::process::id()
        ));
        let err = connect(&address, Some(Duration::from_secs(1))).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connect { ref source, .. }
                if source.kind() == ErrorKind::ConnectionRefused
        ));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_connect_times_out_on_full_backlog() {
        let address = SocketAddress::Abstract(format!(
            "dmmp-transport-backlog-{}",
            std::process::id()
        ));
        let (sun, len) = sockaddr_un(&address).unwrap();
        let listener = unconnected_stream().unwrap();
        // SAFETY: `sun`/`len` describe a valid abstract address and the
        // descriptor is an open, unbound AF_UNIX stream socket.
        let rc = unsafe {
            libc::bind(
                listener.as_raw_fd(),
                (&sun as *const libc::sockaddr_un).cast::<libc::sockaddr>(),
                len,
            )
        };
        assert_eq!(rc, 0, "bind: {}", std::io::Error::last_os_error());
        // SAFETY: listen(2) on a bound socket we own.
        let rc = unsafe { libc::listen(listener.as_raw_fd(), 0) };
        assert_eq!(rc, 0, "listen: {}", std::io::Error::last_os_error());

        // Never accepted: once the backlog is full the next connect blocks.
        let timeout = Duration::from_millis(200);
        let mut pending = Vec::new();
        let err = loop {
            match connect(&address, Some(timeout)) {
                Ok(stream) => {
                    pending.push(stream);
                    assert!(pending.len() < 8, "backlog never filled");
                }
                Err(err) => break err,
            }
        };
        assert!(
            matches!(err, TransportError::Timeout { timeout: t, .. } if t == timeout),
            "unexpected error: {err}"
        );
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_peer_credentials_of_local_listener() {
        let dir = temp_dir("uds-cred");
        let sock_path = dir.join("cred.sock");
        let _ = std::fs::remove_file(&sock_path);
        let listener = UnixListener::bind(&sock_path).unwrap();

        let stream = connect(&SocketAddress::Path(sock_path), None).unwrap();
        let _server = listener.accept().unwrap();

        let (_, _, pid) = stream.peer_credentials().unwrap();
        assert_eq!(pid, std::process::id());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
