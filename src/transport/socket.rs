//! Socket Abstraction (C6): host resolution, create/listen/accept/connect,
//! non-blocking read/write, close.
//!
//! Grounded on `p_sockets.c`'s `SOPC_Socket_*` family (zephyr and windows
//! variants in `original_source/`): same operation set, same TCP_NODELAY /
//! SO_REUSEADDR / IPV6_V6ONLY handling, but built on `std::net` wherever std
//! already exposes the behaviour, reaching for raw `libc` calls only where
//! std has no equivalent (`SO_REUSEADDR`, clearing `IPV6_V6ONLY`, a
//! genuinely non-blocking `connect`, and `SO_ERROR` after one).

use std::io::{self, Read, Write};
use std::mem;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
use std::ptr;

use crate::error::{Error, Result};

/// Resolved addresses for a `host`/`port` pair.
pub struct AddrInfo {
    addrs: Vec<SocketAddr>,
}

impl AddrInfo {
    pub fn iter(&self) -> impl Iterator<Item = &SocketAddr> {
        self.addrs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

pub fn addr_info_get(host: &str, port: u16) -> Result<AddrInfo> {
    let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs().map_err(Error::from)?.collect();
    Ok(AddrInfo { addrs })
}

fn set_bool_opt(fd: RawFd, level: libc::c_int, name: libc::c_int, value: bool) -> Result<()> {
    let v: libc::c_int = value as libc::c_int;
    let rc = unsafe {
        libc::setsockopt(
            fd,
            level,
            name,
            &v as *const libc::c_int as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if rc < 0 {
        return Err(Error::from(io::Error::last_os_error()));
    }
    Ok(())
}

/// Fill a `sockaddr_storage` with `addr`'s bytes in the layout the kernel
/// expects, returning the struct and its effective length.
fn to_raw_sockaddr(addr: SocketAddr) -> (libc::sockaddr_storage, libc::socklen_t) {
    unsafe {
        let mut storage: libc::sockaddr_storage = mem::zeroed();
        let len = match addr {
            SocketAddr::V4(v4) => {
                let sin = libc::sockaddr_in {
                    sin_family: libc::AF_INET as libc::sa_family_t,
                    sin_port: v4.port().to_be(),
                    sin_addr: libc::in_addr {
                        s_addr: u32::from_ne_bytes(v4.ip().octets()),
                    },
                    sin_zero: [0; 8],
                };
                ptr::copy_nonoverlapping(
                    &sin as *const libc::sockaddr_in as *const u8,
                    &mut storage as *mut libc::sockaddr_storage as *mut u8,
                    mem::size_of::<libc::sockaddr_in>(),
                );
                mem::size_of::<libc::sockaddr_in>()
            }
            SocketAddr::V6(v6) => {
                let sin6 = libc::sockaddr_in6 {
                    sin6_family: libc::AF_INET6 as libc::sa_family_t,
                    sin6_port: v6.port().to_be(),
                    sin6_flowinfo: v6.flowinfo(),
                    sin6_addr: libc::in6_addr {
                        s6_addr: v6.ip().octets(),
                    },
                    sin6_scope_id: v6.scope_id(),
                };
                ptr::copy_nonoverlapping(
                    &sin6 as *const libc::sockaddr_in6 as *const u8,
                    &mut storage as *mut libc::sockaddr_storage as *mut u8,
                    mem::size_of::<libc::sockaddr_in6>(),
                );
                mem::size_of::<libc::sockaddr_in6>()
            }
        };
        (storage, len as libc::socklen_t)
    }
}

/// A listening TCP socket.
pub struct Listener(TcpListener);

impl Listener {
    /// `create_new` + `listen` collapsed into one call, since `TcpListener`
    /// binds at construction; `reuse_addr` and v6-only clearing are applied
    /// to the underlying fd before the caller ever sees it.
    pub fn listen(addr: SocketAddr, reuse_addr: bool) -> Result<Listener> {
        // std has no pre-bind hook to set SO_REUSEADDR, so the raw socket is
        // built by hand and only then handed to `TcpListener` via its fd.
        let domain = if addr.is_ipv4() { libc::AF_INET } else { libc::AF_INET6 };
        let fd = unsafe { libc::socket(domain, libc::SOCK_STREAM, 0) };
        if fd < 0 {
            return Err(Error::from(io::Error::last_os_error()));
        }
        if reuse_addr {
            set_bool_opt(fd, libc::SOL_SOCKET, libc::SO_REUSEADDR, true)?;
        }
        if addr.is_ipv6() {
            set_bool_opt(fd, libc::IPPROTO_IPV6, libc::IPV6_V6ONLY, false)?;
        }
        let (sockaddr, len) = to_raw_sockaddr(addr);
        let rc = unsafe {
            libc::bind(fd, &sockaddr as *const _ as *const libc::sockaddr, len)
        };
        if rc < 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(Error::from(err));
        }
        let rc = unsafe { libc::listen(fd, libc::SOMAXCONN) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(Error::from(err));
        }
        let listener = unsafe { TcpListener::from_raw_fd(fd) };
        listener.set_nonblocking(true).map_err(Error::from)?;
        log::debug!("listening on {addr} (reuse_addr={reuse_addr})");
        Ok(Listener(listener))
    }

    /// `None` means the call would have blocked (no pending connection).
    pub fn accept(&self) -> Result<Option<(Connection, SocketAddr)>> {
        match self.0.accept() {
            Ok((stream, addr)) => {
                stream.set_nodelay(true).map_err(Error::from)?;
                stream.set_nonblocking(true).map_err(Error::from)?;
                log::debug!("accepted connection from {addr}");
                Ok(Some((Connection(stream), addr)))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}

/// A connected TCP socket, in either direction (accepted or initiated).
pub struct Connection(TcpStream);

impl Connection {
    /// Initiate a non-blocking connect. Returns immediately; the caller
    /// waits for writability on the returned connection's fd, then calls
    /// [`Connection::check_ack_connect`] to learn the outcome.
    pub fn connect(addr: SocketAddr) -> Result<Connection> {
        let domain = if addr.is_ipv4() { libc::AF_INET } else { libc::AF_INET6 };
        let fd = unsafe { libc::socket(domain, libc::SOCK_STREAM, 0) };
        if fd < 0 {
            return Err(Error::from(io::Error::last_os_error()));
        }
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL, 0) };
        if flags >= 0 {
            unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
        }
        let (sockaddr, len) = to_raw_sockaddr(addr);
        let rc = unsafe { libc::connect(fd, &sockaddr as *const _ as *const libc::sockaddr, len) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() != Some(libc::EINPROGRESS) {
                unsafe { libc::close(fd) };
                return Err(Error::from(err));
            }
        }
        let stream = unsafe { TcpStream::from_raw_fd(fd) };
        stream.set_nodelay(true).map_err(Error::from)?;
        Ok(Connection(stream))
    }

    /// Resolve a pending non-blocking connect: `Ok(())` if it succeeded,
    /// otherwise the `SO_ERROR` the kernel recorded.
    pub fn check_ack_connect(&self) -> Result<()> {
        let fd = self.0.as_raw_fd();
        let mut err: libc::c_int = 0;
        let mut len = mem::size_of::<libc::c_int>() as libc::socklen_t;
        let rc = unsafe {
            libc::getsockopt(
                fd,
                libc::SOL_SOCKET,
                libc::SO_ERROR,
                &mut err as *mut libc::c_int as *mut libc::c_void,
                &mut len,
            )
        };
        if rc < 0 {
            return Err(Error::from(io::Error::last_os_error()));
        }
        if err != 0 {
            return Err(Error::from(io::Error::from_raw_os_error(err)));
        }
        Ok(())
    }

    /// Partial write is a successful `Ok(sent)` with `sent < bytes.len()`.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        match self.0.write(bytes) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(Error::would_block()),
            Err(e) => Err(Error::from(e)),
        }
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.0.read(buf) {
            Ok(0) => Err(Error::closed()),
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(Error::would_block()),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// Shutdown then drop. Tolerates `NotConnected`, which `shutdown` on an
    /// already half-closed socket reports -- closing twice is safe.
    pub fn close(self) -> Result<()> {
        log::trace!("closing connection fd={}", self.0.as_raw_fd());
        match self.0.shutdown(std::net::Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(Error::from(e)),
        }
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_info_resolves_localhost() {
        let info = addr_info_get("127.0.0.1", 0).unwrap();
        assert!(!info.is_empty());
    }

    #[test]
    fn listen_accept_connect_round_trip() {
        let listener = Listener::listen("127.0.0.1:0".parse().unwrap(), true).unwrap();
        let local_addr = {
            // `TcpListener::local_addr` is infallible once bound; recover the
            // ephemeral port the kernel picked.
            let fd = listener.as_raw_fd();
            let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
            let mut len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
            unsafe {
                libc::getsockname(fd, &mut storage as *mut _ as *mut libc::sockaddr, &mut len);
            }
            let sin = unsafe { &*(&storage as *const _ as *const libc::sockaddr_in) };
            SocketAddr::from(([127, 0, 0, 1], u16::from_be(sin.sin_port)))
        };

        let mut client = Connection::connect(local_addr).unwrap();
        // Poll for the pending accept; a non-blocking connect to localhost
        // typically completes almost immediately.
        let mut accepted = None;
        for _ in 0..1000 {
            if let Some(pair) = listener.accept().unwrap() {
                accepted = Some(pair);
                break;
            }
            std::thread::yield_now();
        }
        let (mut server, _addr) = accepted.expect("connection was not accepted in time");
        client.check_ack_connect().unwrap();

        for _ in 0..1000 {
            if client.write(b"hi").is_ok() {
                break;
            }
        }
        let mut buf = [0u8; 2];
        let mut n = 0;
        for _ in 0..1000 {
            match server.read(&mut buf) {
                Ok(read) => {
                    n = read;
                    break;
                }
                Err(e) if e.kind() == crate::error::Kind::WouldBlock => continue,
                Err(e) => panic!("unexpected read error: {e}"),
            }
        }
        assert_eq!(n, 2);
        assert_eq!(&buf, b"hi");
    }
}
