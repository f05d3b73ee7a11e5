//! Readiness multiplexing over `select(2)`.
//!
//! Grounded on the `SOPC_SocketSet` type in `p_sockets.c`: a thin wrapper
//! around `fd_set` with `Add`/`Remove`/`IsPresent`/`Clear`, and
//! `SOPC_Socket_WaitSocketEvents` waiting on three such sets (read, write,
//! except) with a millisecond timeout.

use std::io;
use std::mem;
use std::os::unix::io::RawFd;
use std::time::Duration;

use crate::error::{Error, Result};

/// A set of file descriptors to watch, backed by a raw `fd_set`.
pub struct SocketSet {
    set: libc::fd_set,
    max_fd: RawFd,
}

impl SocketSet {
    pub fn new() -> Self {
        let mut set = unsafe { mem::zeroed::<libc::fd_set>() };
        unsafe { libc::FD_ZERO(&mut set) };
        SocketSet { set, max_fd: -1 }
    }

    pub fn add(&mut self, fd: RawFd) {
        unsafe { libc::FD_SET(fd, &mut self.set) };
        if fd > self.max_fd {
            self.max_fd = fd;
        }
    }

    pub fn remove(&mut self, fd: RawFd) {
        unsafe { libc::FD_CLR(fd, &mut self.set) };
    }

    pub fn is_present(&self, fd: RawFd) -> bool {
        // `FD_ISSET` takes `*mut fd_set` in `libc` despite never writing
        // through it; the cast just matches that signature.
        unsafe { libc::FD_ISSET(fd, &self.set as *const libc::fd_set as *mut libc::fd_set) }
    }

    pub fn clear(&mut self) {
        unsafe { libc::FD_ZERO(&mut self.set) };
        self.max_fd = -1;
    }
}

impl Default for SocketSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for activity on up to three sets, mirroring
/// `SOPC_Socket_WaitSocketEvents(readSet, writeSet, exceptSet, waitMs)`.
/// `None` for a set means that axis is not being watched this call.
/// `wait_ms = 0` polls without blocking; `None` blocks indefinitely.
pub fn wait(
    read_set: Option<&mut SocketSet>,
    write_set: Option<&mut SocketSet>,
    except_set: Option<&mut SocketSet>,
    wait: Option<Duration>,
) -> Result<i32> {
    let max_fd = [&read_set, &write_set, &except_set]
        .iter()
        .filter_map(|s| s.as_ref().map(|s| s.max_fd))
        .max()
        .unwrap_or(-1);

    let mut timeout = wait.map(|d| libc::timeval {
        tv_sec: d.as_secs() as libc::time_t,
        tv_usec: d.subsec_micros() as libc::suseconds_t,
    });

    let read_ptr = read_set
        .map(|s| &mut s.set as *mut libc::fd_set)
        .unwrap_or(std::ptr::null_mut());
    let write_ptr = write_set
        .map(|s| &mut s.set as *mut libc::fd_set)
        .unwrap_or(std::ptr::null_mut());
    let except_ptr = except_set
        .map(|s| &mut s.set as *mut libc::fd_set)
        .unwrap_or(std::ptr::null_mut());
    let timeout_ptr = timeout
        .as_mut()
        .map(|t| t as *mut libc::timeval)
        .unwrap_or(std::ptr::null_mut());

    let rc = unsafe { libc::select(max_fd + 1, read_ptr, write_ptr, except_ptr, timeout_ptr) };
    if rc < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(0);
        }
        return Err(Error::from(err));
    }
    Ok(rc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::socket::{addr_info_get, Listener};

    #[test]
    fn add_remove_is_present_round_trip() {
        let mut set = SocketSet::new();
        set.add(3);
        assert!(set.is_present(3));
        set.remove(3);
        assert!(!set.is_present(3));
    }

    #[test]
    fn clear_empties_the_set() {
        let mut set = SocketSet::new();
        set.add(4);
        set.clear();
        assert!(!set.is_present(4));
    }

    #[test]
    fn wait_times_out_with_nothing_ready() {
        let _ = addr_info_get("127.0.0.1", 0);
        let listener = Listener::listen("127.0.0.1:0".parse().unwrap(), true).unwrap();
        let mut read_set = SocketSet::new();
        read_set.add(listener.as_raw_fd());
        let ready = wait(Some(&mut read_set), None, None, Some(Duration::from_millis(10))).unwrap();
        assert_eq!(ready, 0);
    }
}
