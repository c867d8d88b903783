//! Buffered output streams over the `write` connector.
//!
//! The stream never talks to a provider directly; it is written once against
//! the POSIX names and works on whatever target is registered.

use core::fmt;

use gloss_abi::{Errno, Fd, STDERR_FILENO, STDOUT_FILENO, SysResult};
use spin::{Mutex, MutexGuard};

use crate::connector;
use crate::reent::with_reent;

pub const STDOUT_BUFSIZ: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMode {
    Unbuffered,
    LineBuffered,
    FullyBuffered,
}

pub struct Stream<const N: usize> {
    fd: Fd,
    mode: BufferMode,
    buf: [u8; N],
    len: usize,
    error: bool,
}

/// Write all of `bytes`, looping over short writes. Returns how many bytes
/// went out alongside the outcome.
fn write_fully(fd: Fd, bytes: &[u8]) -> (usize, SysResult<()>) {
    let mut done = 0;
    while done < bytes.len() {
        let n = connector::write(fd, &bytes[done..]);
        if n < 0 {
            let err = with_reent(|r| r.errno()).unwrap_or(Errno::EIO);
            return (done, Err(err));
        }
        if n == 0 {
            // No progress and no error code from the target.
            with_reent(|r| r.set_errno(Errno::EIO));
            return (done, Err(Errno::EIO));
        }
        done += n as usize;
    }
    (done, Ok(()))
}

impl<const N: usize> Stream<N> {
    pub const fn new(fd: Fd, mode: BufferMode) -> Self {
        Self {
            fd,
            mode,
            buf: [0; N],
            len: 0,
            error: false,
        }
    }

    pub fn fd(&self) -> Fd {
        self.fd
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    /// Change buffering; pending bytes are flushed first.
    pub fn set_mode(&mut self, mode: BufferMode) -> SysResult<()> {
        self.flush()?;
        self.mode = mode;
        Ok(())
    }

    /// Bytes accepted but not yet written.
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn clear_error(&mut self) {
        self.error = false;
    }

    /// `fwrite`-style: returns how many bytes of `bytes` were accepted,
    /// either written out or held in the buffer. A short count means a
    /// write failed; the error flag and the context's errno say why.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        self.put(bytes).0
    }

    /// Accept all of `bytes` or report the first failure. On `Err` part of
    /// `bytes` may already be buffered or written; [`Stream::write`] gives
    /// the count.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> SysResult<()> {
        self.put(bytes).1
    }

    fn put(&mut self, mut bytes: &[u8]) -> (usize, SysResult<()>) {
        if self.mode == BufferMode::Unbuffered || N == 0 {
            if let Err(err) = self.flush() {
                return (0, Err(err));
            }
            let (written, result) = write_fully(self.fd, bytes);
            if result.is_err() {
                self.error = true;
            }
            return (written, result);
        }

        let newline = bytes.contains(&b'\n');
        let mut accepted = 0;
        while !bytes.is_empty() {
            if self.len == N {
                if let Err(err) = self.flush() {
                    return (accepted, Err(err));
                }
            }
            let take = (N - self.len).min(bytes.len());
            self.buf[self.len..self.len + take].copy_from_slice(&bytes[..take]);
            self.len += take;
            accepted += take;
            bytes = &bytes[take..];
        }
        // Everything is buffered by now; a failed flush keeps it there.
        if newline && self.mode == BufferMode::LineBuffered {
            if let Err(err) = self.flush() {
                return (accepted, Err(err));
            }
        }
        (accepted, Ok(()))
    }

    /// Push buffered bytes to the descriptor. On failure the unwritten tail
    /// stays buffered and the error flag is set.
    pub fn flush(&mut self) -> SysResult<()> {
        if self.len == 0 {
            return Ok(());
        }
        let (written, result) = write_fully(self.fd, &self.buf[..self.len]);
        self.buf.copy_within(written..self.len, 0);
        self.len -= written;
        if result.is_err() {
            self.error = true;
        }
        result
    }
}

impl<const N: usize> fmt::Write for Stream<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

static STDOUT: Mutex<Stream<STDOUT_BUFSIZ>> =
    Mutex::new(Stream::new(STDOUT_FILENO, BufferMode::LineBuffered));
static STDERR: Mutex<Stream<0>> = Mutex::new(Stream::new(STDERR_FILENO, BufferMode::Unbuffered));

/// Line-buffered standard output.
pub fn stdout() -> MutexGuard<'static, Stream<STDOUT_BUFSIZ>> {
    STDOUT.lock()
}

/// Unbuffered standard error.
pub fn stderr() -> MutexGuard<'static, Stream<0>> {
    STDERR.lock()
}
