//! POSIX-named entry points for the upper library.
//!
//! Each one fetches the calling context's handle and forwards to the `_r`
//! form of the registered provider, nothing more.

use core::ffi::c_int;

use gloss_abi::{Clock, Fd, Off, Pid, Stat, Timeval, Timezone, Tms};

use crate::provider::syscalls;
use crate::reent::with_reent;
use crate::reentrant::Reentrant;

pub fn read(fd: Fd, buf: &mut [u8]) -> isize {
    with_reent(|r| syscalls().read_r(r, fd, buf))
}

pub fn write(fd: Fd, buf: &[u8]) -> isize {
    with_reent(|r| syscalls().write_r(r, fd, buf))
}

pub fn open(path: &[u8], flags: c_int, mode: c_int) -> c_int {
    with_reent(|r| syscalls().open_r(r, path, flags, mode))
}

pub fn close(fd: Fd) -> c_int {
    with_reent(|r| syscalls().close_r(r, fd))
}

pub fn lseek(fd: Fd, offset: Off, whence: c_int) -> Off {
    with_reent(|r| syscalls().lseek_r(r, fd, offset, whence))
}

pub fn stat(path: &[u8], st: &mut Stat) -> c_int {
    with_reent(|r| syscalls().stat_r(r, path, st))
}

pub fn fstat(fd: Fd, st: &mut Stat) -> c_int {
    with_reent(|r| syscalls().fstat_r(r, fd, st))
}

pub fn link(existing: &[u8], new: &[u8]) -> c_int {
    with_reent(|r| syscalls().link_r(r, existing, new))
}

pub fn unlink(path: &[u8]) -> c_int {
    with_reent(|r| syscalls().unlink_r(r, path))
}

pub fn kill(pid: Pid, sig: c_int) -> c_int {
    with_reent(|r| syscalls().kill_r(r, pid, sig))
}

/// Returns the previous break, or [`SBRK_FAILED`](crate::SBRK_FAILED).
pub fn sbrk(increment: isize) -> usize {
    with_reent(|r| syscalls().sbrk_r(r, increment))
}

pub fn gettimeofday(tv: Option<&mut Timeval>, tz: Option<&mut Timezone>) -> c_int {
    with_reent(|r| syscalls().gettimeofday_r(r, tv, tz))
}

pub fn isatty(fd: Fd) -> c_int {
    with_reent(|r| syscalls().isatty_r(r, fd))
}

pub fn getpid() -> Pid {
    with_reent(|r| syscalls().getpid_r(r))
}

pub fn times(buf: &mut Tms) -> Clock {
    with_reent(|r| syscalls().times_r(r, buf))
}

pub fn fork() -> Pid {
    with_reent(|r| syscalls().fork_r(r))
}

pub fn execve(path: &[u8], argv: &[&[u8]], envp: &[&[u8]]) -> c_int {
    with_reent(|r| syscalls().execve_r(r, path, argv, envp))
}

pub fn wait(status: Option<&mut c_int>) -> Pid {
    with_reent(|r| syscalls().wait_r(r, status))
}

pub fn _exit(status: c_int) -> ! {
    syscalls().exit(status)
}

pub fn getentropy(buf: &mut [u8]) -> c_int {
    with_reent(|r| syscalls().getentropy_r(r, buf))
}

pub fn mkdir(path: &[u8], mode: c_int) -> c_int {
    with_reent(|r| syscalls().mkdir_r(r, path, mode))
}

pub fn rename(old: &[u8], new: &[u8]) -> c_int {
    with_reent(|r| syscalls().rename_r(r, old, new))
}

pub fn fcntl(fd: Fd, cmd: c_int, arg: c_int) -> c_int {
    with_reent(|r| syscalls().fcntl_r(r, fd, cmd, arg))
}
