//! `_r` entry points: the provider's primitives in C calling convention.
//!
//! Each call forwards to the provider and, on failure, records the error in
//! the handle it was given and returns the call's sentinel. A success never
//! writes the handle.

use core::ffi::c_int;

use gloss_abi::{
    Clock, Errno, Fd, GETENTROPY_MAX, Mode, Off, OpenFlags, Pid, Stat, SysResult, Timeval,
    Timezone, Tms, Whence,
};

use crate::provider::SyscallProvider;
use crate::reent::Reent;

/// `sbrk` failure sentinel, C `(void *)-1`.
pub const SBRK_FAILED: usize = usize::MAX;

fn decode_mode(mode: c_int) -> Mode {
    Mode::from_bits_truncate(mode as u32)
}

fn status(r: &mut Reent, result: SysResult<()>) -> c_int {
    r.complete(result.map(|()| 0), -1)
}

pub trait Reentrant {
    fn read_r(&self, r: &mut Reent, fd: Fd, buf: &mut [u8]) -> isize;
    fn write_r(&self, r: &mut Reent, fd: Fd, buf: &[u8]) -> isize;
    fn open_r(&self, r: &mut Reent, path: &[u8], flags: c_int, mode: c_int) -> c_int;
    fn close_r(&self, r: &mut Reent, fd: Fd) -> c_int;
    fn lseek_r(&self, r: &mut Reent, fd: Fd, offset: Off, whence: c_int) -> Off;
    fn stat_r(&self, r: &mut Reent, path: &[u8], st: &mut Stat) -> c_int;
    fn fstat_r(&self, r: &mut Reent, fd: Fd, st: &mut Stat) -> c_int;
    fn link_r(&self, r: &mut Reent, existing: &[u8], new: &[u8]) -> c_int;
    fn unlink_r(&self, r: &mut Reent, path: &[u8]) -> c_int;
    fn kill_r(&self, r: &mut Reent, pid: Pid, sig: c_int) -> c_int;
    fn getpid_r(&self, r: &mut Reent) -> Pid;
    fn gettimeofday_r(
        &self,
        r: &mut Reent,
        tv: Option<&mut Timeval>,
        tz: Option<&mut Timezone>,
    ) -> c_int;
    fn sbrk_r(&self, r: &mut Reent, increment: isize) -> usize;
    fn isatty_r(&self, r: &mut Reent, fd: Fd) -> c_int;
    fn times_r(&self, r: &mut Reent, buf: &mut Tms) -> Clock;
    fn fork_r(&self, r: &mut Reent) -> Pid;
    fn execve_r(&self, r: &mut Reent, path: &[u8], argv: &[&[u8]], envp: &[&[u8]]) -> c_int;
    fn wait_r(&self, r: &mut Reent, status: Option<&mut c_int>) -> Pid;
    fn getentropy_r(&self, r: &mut Reent, buf: &mut [u8]) -> c_int;
    fn mkdir_r(&self, r: &mut Reent, path: &[u8], mode: c_int) -> c_int;
    fn rename_r(&self, r: &mut Reent, old: &[u8], new: &[u8]) -> c_int;
    fn fcntl_r(&self, r: &mut Reent, fd: Fd, cmd: c_int, arg: c_int) -> c_int;
}

impl<P: SyscallProvider + ?Sized> Reentrant for P {
    fn read_r(&self, r: &mut Reent, fd: Fd, buf: &mut [u8]) -> isize {
        r.complete(self.read(fd, buf).map(|n| n as isize), -1)
    }

    fn write_r(&self, r: &mut Reent, fd: Fd, buf: &[u8]) -> isize {
        r.complete(self.write(fd, buf).map(|n| n as isize), -1)
    }

    fn open_r(&self, r: &mut Reent, path: &[u8], flags: c_int, mode: c_int) -> c_int {
        let result = self.open(path, OpenFlags::from_c_int(flags), decode_mode(mode));
        r.complete(result, -1)
    }

    fn close_r(&self, r: &mut Reent, fd: Fd) -> c_int {
        status(r, self.close(fd))
    }

    fn lseek_r(&self, r: &mut Reent, fd: Fd, offset: Off, whence: c_int) -> Off {
        let result = Whence::from_c_int(whence).and_then(|w| self.lseek(fd, offset, w));
        r.complete(result, -1)
    }

    fn stat_r(&self, r: &mut Reent, path: &[u8], st: &mut Stat) -> c_int {
        status(r, self.stat(path).map(|s| *st = s))
    }

    fn fstat_r(&self, r: &mut Reent, fd: Fd, st: &mut Stat) -> c_int {
        status(r, self.fstat(fd).map(|s| *st = s))
    }

    fn link_r(&self, r: &mut Reent, existing: &[u8], new: &[u8]) -> c_int {
        status(r, self.link(existing, new))
    }

    fn unlink_r(&self, r: &mut Reent, path: &[u8]) -> c_int {
        status(r, self.unlink(path))
    }

    fn kill_r(&self, r: &mut Reent, pid: Pid, sig: c_int) -> c_int {
        status(r, self.kill(pid, sig))
    }

    fn getpid_r(&self, r: &mut Reent) -> Pid {
        r.complete(self.getpid(), -1)
    }

    fn gettimeofday_r(
        &self,
        r: &mut Reent,
        tv: Option<&mut Timeval>,
        tz: Option<&mut Timezone>,
    ) -> c_int {
        let result = self.gettimeofday().map(|now| {
            if let Some(tv) = tv {
                *tv = now;
            }
            if let Some(tz) = tz {
                *tz = Timezone::default();
            }
        });
        status(r, result)
    }

    fn sbrk_r(&self, r: &mut Reent, increment: isize) -> usize {
        r.complete(self.sbrk(increment), SBRK_FAILED)
    }

    fn isatty_r(&self, r: &mut Reent, fd: Fd) -> c_int {
        let result = self
            .isatty(fd)
            .and_then(|tty| if tty { Ok(1) } else { Err(Errno::ENOTTY) });
        r.complete(result, 0)
    }

    fn times_r(&self, r: &mut Reent, buf: &mut Tms) -> Clock {
        let result = self.times().map(|(clock, tms)| {
            *buf = tms;
            clock
        });
        r.complete(result, -1)
    }

    fn fork_r(&self, r: &mut Reent) -> Pid {
        r.complete(self.fork(), -1)
    }

    fn execve_r(&self, r: &mut Reent, path: &[u8], argv: &[&[u8]], envp: &[&[u8]]) -> c_int {
        let Err(err) = self.execve(path, argv, envp);
        r.set_errno(err);
        -1
    }

    fn wait_r(&self, r: &mut Reent, status: Option<&mut c_int>) -> Pid {
        let result = self.wait().map(|(pid, code)| {
            if let Some(status) = status {
                *status = code;
            }
            pid
        });
        r.complete(result, -1)
    }

    fn getentropy_r(&self, r: &mut Reent, buf: &mut [u8]) -> c_int {
        if buf.len() > GETENTROPY_MAX {
            r.set_errno(Errno::EIO);
            return -1;
        }
        status(r, self.getentropy(buf))
    }

    fn mkdir_r(&self, r: &mut Reent, path: &[u8], mode: c_int) -> c_int {
        status(r, self.mkdir(path, decode_mode(mode)))
    }

    fn rename_r(&self, r: &mut Reent, old: &[u8], new: &[u8]) -> c_int {
        status(r, self.rename(old, new))
    }

    fn fcntl_r(&self, r: &mut Reent, fd: Fd, cmd: c_int, arg: c_int) -> c_int {
        r.complete(self.fcntl(fd, cmd, arg), -1)
    }
}
