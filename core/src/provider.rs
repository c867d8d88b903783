//! The low-level primitive set a target implements.
//!
//! Each method's default body is the no-OS fallback: it touches nothing and
//! fails with `ENOSYS`. A target overrides only what it supports, so every
//! primitive has exactly one body per target. [`NoSys`] overrides nothing
//! and is what [`syscalls`] hands out until a target registers.

use core::convert::Infallible;
use core::ffi::c_int;

use gloss_abi::{
    Clock, Errno, Fd, Mode, Off, OpenFlags, Pid, Stat, SysResult, Timeval, Tms, Whence,
};
use gloss_lib::{ServiceCell, klog_debug, klog_info};

#[inline]
fn nosys<T>(name: &str) -> SysResult<T> {
    klog_debug!("nosys: {} not implemented", name);
    Err(Errno::ENOSYS)
}

pub trait SyscallProvider: Sync {
    fn read(&self, fd: Fd, buf: &mut [u8]) -> SysResult<usize> {
        let _ = (fd, buf);
        nosys("read")
    }

    fn write(&self, fd: Fd, buf: &[u8]) -> SysResult<usize> {
        let _ = (fd, buf);
        nosys("write")
    }

    fn open(&self, path: &[u8], flags: OpenFlags, mode: Mode) -> SysResult<Fd> {
        let _ = (path, flags, mode);
        nosys("open")
    }

    fn close(&self, fd: Fd) -> SysResult<()> {
        let _ = fd;
        nosys("close")
    }

    fn lseek(&self, fd: Fd, offset: Off, whence: Whence) -> SysResult<Off> {
        let _ = (fd, offset, whence);
        nosys("lseek")
    }

    fn stat(&self, path: &[u8]) -> SysResult<Stat> {
        let _ = path;
        nosys("stat")
    }

    fn fstat(&self, fd: Fd) -> SysResult<Stat> {
        let _ = fd;
        nosys("fstat")
    }

    fn link(&self, existing: &[u8], new: &[u8]) -> SysResult<()> {
        let _ = (existing, new);
        nosys("link")
    }

    fn unlink(&self, path: &[u8]) -> SysResult<()> {
        let _ = path;
        nosys("unlink")
    }

    fn kill(&self, pid: Pid, sig: c_int) -> SysResult<()> {
        let _ = (pid, sig);
        nosys("kill")
    }

    fn getpid(&self) -> SysResult<Pid> {
        nosys("getpid")
    }

    fn gettimeofday(&self) -> SysResult<Timeval> {
        nosys("gettimeofday")
    }

    /// Move the program break; returns the previous break.
    fn sbrk(&self, increment: isize) -> SysResult<usize> {
        let _ = increment;
        nosys("sbrk")
    }

    /// `Ok(false)` for a valid descriptor that is not a terminal.
    fn isatty(&self, fd: Fd) -> SysResult<bool> {
        let _ = fd;
        nosys("isatty")
    }

    /// Elapsed clock ticks plus the process times.
    fn times(&self) -> SysResult<(Clock, Tms)> {
        nosys("times")
    }

    fn fork(&self) -> SysResult<Pid> {
        nosys("fork")
    }

    /// Only returns on failure.
    fn execve(&self, path: &[u8], argv: &[&[u8]], envp: &[&[u8]]) -> SysResult<Infallible> {
        let _ = (path, argv, envp);
        nosys("execve")
    }

    /// Reaped child pid and its status.
    fn wait(&self) -> SysResult<(Pid, c_int)> {
        nosys("wait")
    }

    fn exit(&self, status: c_int) -> ! {
        let _ = status;
        loop {
            core::hint::spin_loop();
        }
    }

    /// Fill `buf` with random bytes. Callers keep `buf` within `GETENTROPY_MAX`.
    fn getentropy(&self, buf: &mut [u8]) -> SysResult<()> {
        let _ = buf;
        nosys("getentropy")
    }

    fn mkdir(&self, path: &[u8], mode: Mode) -> SysResult<()> {
        let _ = (path, mode);
        nosys("mkdir")
    }

    fn rename(&self, old: &[u8], new: &[u8]) -> SysResult<()> {
        let _ = (old, new);
        nosys("rename")
    }

    fn fcntl(&self, fd: Fd, cmd: c_int, arg: c_int) -> SysResult<c_int> {
        let _ = (fd, cmd, arg);
        nosys("fcntl")
    }
}

/// The target with no operating system underneath.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSys;

impl SyscallProvider for NoSys {}

static NO_SYS: NoSys = NoSys;
static SYSCALLS: ServiceCell<dyn SyscallProvider> = ServiceCell::new("syscalls");

/// Install the target's provider. Panics if one is already registered.
pub fn register_syscalls(provider: &'static dyn SyscallProvider) {
    SYSCALLS.register(provider);
    klog_info!("syscall provider registered");
}

pub fn is_syscalls_registered() -> bool {
    SYSCALLS.is_initialized()
}

/// The registered provider, or [`NoSys`] before registration.
#[inline]
pub fn syscalls() -> &'static dyn SyscallProvider {
    match SYSCALLS.try_get() {
        Some(provider) => provider,
        None => &NO_SYS,
    }
}
