//! D-channel I/O seam
//!
//! The stack talks to the HDLC framer through the `FrameIo` trait. The
//! framer contract: `send` transmits exactly one frame and appends the
//! FCS itself (the two reserved tail bytes are part of the write length);
//! `recv` returns one complete frame with the FCS already verified, the
//! two trailing FCS bytes still counted in the returned length. The fd
//! must be non-blocking.

use std::time::Duration;

use qpri_core::PriResult;

/// One-frame-at-a-time transport under the Q.921 engine.
pub trait FrameIo {
    /// Write one complete frame. Partial writes are errors.
    fn send(&mut self, frame: &[u8]) -> PriResult<()>;

    /// Read one complete frame into `buf`. `Ok(None)` when nothing is
    /// pending.
    fn recv(&mut self, buf: &mut [u8]) -> PriResult<Option<usize>>;

    /// Block until the channel is readable or the timeout elapses.
    /// `None` waits indefinitely. Returns true when readable.
    fn wait(&mut self, timeout: Option<Duration>) -> PriResult<bool>;
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use std::os::unix::io::{BorrowedFd, RawFd};

        use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

        use qpri_core::PriError;

        /// `FrameIo` over a raw file descriptor in HDLC mode.
        ///
        /// The descriptor is used as-is; `FdIo::owning` additionally
        /// closes it on drop.
        pub struct FdIo {
            fd: RawFd,
            owned: bool,
        }

        impl FdIo {
            /// Wrap a borrowed descriptor.
            pub fn new(fd: RawFd) -> Self {
                FdIo { fd, owned: false }
            }

            /// Wrap a descriptor and close it on drop.
            pub fn owning(fd: RawFd) -> Self {
                FdIo { fd, owned: true }
            }

            pub fn fd(&self) -> RawFd {
                self.fd
            }

            fn errno() -> i32 {
                std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
            }
        }

        impl FrameIo for FdIo {
            fn send(&mut self, frame: &[u8]) -> PriResult<()> {
                let res = unsafe {
                    libc::write(self.fd, frame.as_ptr() as *const libc::c_void, frame.len())
                };
                if res < 0 {
                    return Err(PriError::Transmit(Self::errno()));
                }
                if res as usize != frame.len() {
                    return Err(PriError::ShortWrite { wrote: res as usize, len: frame.len() });
                }
                Ok(())
            }

            fn recv(&mut self, buf: &mut [u8]) -> PriResult<Option<usize>> {
                let res = unsafe {
                    libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len())
                };
                if res < 0 {
                    let errno = Self::errno();
                    if errno == libc::EAGAIN || errno == libc::EWOULDBLOCK {
                        return Ok(None);
                    }
                    return Err(PriError::Receive(errno));
                }
                if res == 0 {
                    return Ok(None);
                }
                Ok(Some(res as usize))
            }

            fn wait(&mut self, timeout: Option<Duration>) -> PriResult<bool> {
                let fd = unsafe { BorrowedFd::borrow_raw(self.fd) };
                let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
                let timeout = match timeout {
                    Some(d) => {
                        let ms = d.as_millis().min(u16::MAX as u128) as u16;
                        PollTimeout::from(ms)
                    }
                    None => PollTimeout::NONE,
                };
                match poll(&mut fds, timeout) {
                    // Interrupted waits surface as a timeout; the run loop
                    // re-derives the next deadline and waits again.
                    Err(nix::errno::Errno::EINTR) => Ok(false),
                    Err(e) => Err(PriError::Receive(e as i32)),
                    Ok(0) => Ok(false),
                    Ok(_) => {
                        let readable = fds[0]
                            .revents()
                            .map(|r| r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP))
                            .unwrap_or(false);
                        Ok(readable)
                    }
                }
            }
        }

        impl Drop for FdIo {
            fn drop(&mut self) {
                if self.owned {
                    unsafe { libc::close(self.fd); }
                }
            }
        }
    }
}
