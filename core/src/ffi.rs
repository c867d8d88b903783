//! C symbol exports (`c-abi` feature).
//!
//! Plain names (`read`, `write`, ...) go through the ambient handle; the
//! `_name_r` forms take the caller's `struct _reent *`. Null buffers and
//! paths fail with `EFAULT`.

use core::ffi::{CStr, c_char, c_int, c_void};

use gloss_abi::{Clock, Errno, Fd, Off, Pid, Stat, SysResult, Timeval, Timezone, Tms};

use crate::connector;
use crate::provider::syscalls;
use crate::reent::{Reent, with_reent};
use crate::reentrant::Reentrant;

/// Borrow a NUL-terminated path.
///
/// # Safety
/// `path` is null or points to a NUL-terminated string valid for `'a`.
unsafe fn c_path<'a>(path: *const c_char) -> SysResult<&'a [u8]> {
    if path.is_null() {
        return Err(Errno::EFAULT);
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    Ok(unsafe { CStr::from_ptr(path) }.to_bytes())
}

/// # Safety
/// `buf` is null or valid for `len` bytes of reads for `'a`.
unsafe fn c_bytes<'a>(buf: *const c_void, len: usize) -> SysResult<&'a [u8]> {
    if buf.is_null() {
        return if len == 0 { Ok(&[]) } else { Err(Errno::EFAULT) };
    }
    // SAFETY: caller contract.
    Ok(unsafe { core::slice::from_raw_parts(buf.cast::<u8>(), len) })
}

/// # Safety
/// `buf` is null or valid for `len` bytes of writes for `'a`.
unsafe fn c_bytes_mut<'a>(buf: *mut c_void, len: usize) -> SysResult<&'a mut [u8]> {
    if buf.is_null() {
        return if len == 0 { Ok(&mut []) } else { Err(Errno::EFAULT) };
    }
    // SAFETY: caller contract.
    Ok(unsafe { core::slice::from_raw_parts_mut(buf.cast::<u8>(), len) })
}

fn fault<T>(r: &mut Reent, err: Errno, sentinel: T) -> T {
    r.set_errno(err);
    sentinel
}

/// # Safety
/// `r` is null or points to a live handle owned by the calling context.
unsafe fn with_handle<R>(r: *mut Reent, f: impl FnOnce(&mut Reent) -> R) -> R {
    // SAFETY: caller contract.
    match unsafe { r.as_mut() } {
        Some(r) => f(r),
        None => with_reent(f),
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn __errno() -> *mut c_int {
    with_reent(|r| r.errno_ptr())
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _read_r(r: *mut Reent, fd: Fd, buf: *mut c_void, cnt: usize) -> isize {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_handle(r, |r| match c_bytes_mut(buf, cnt) {
            Ok(buf) => syscalls().read_r(r, fd, buf),
            Err(err) => fault(r, err, -1),
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _write_r(r: *mut Reent, fd: Fd, buf: *const c_void, cnt: usize) -> isize {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_handle(r, |r| match c_bytes(buf, cnt) {
            Ok(buf) => syscalls().write_r(r, fd, buf),
            Err(err) => fault(r, err, -1),
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _open_r(r: *mut Reent, path: *const c_char, flags: c_int, mode: c_int) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_handle(r, |r| match c_path(path) {
            Ok(path) => syscalls().open_r(r, path, flags, mode),
            Err(err) => fault(r, err, -1),
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _close_r(r: *mut Reent, fd: Fd) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { with_handle(r, |r| syscalls().close_r(r, fd)) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _lseek_r(r: *mut Reent, fd: Fd, offset: Off, whence: c_int) -> Off {
    // SAFETY: forwarded caller contract.
    unsafe { with_handle(r, |r| syscalls().lseek_r(r, fd, offset, whence)) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _stat_r(r: *mut Reent, path: *const c_char, st: *mut Stat) -> c_int {
    // SAFETY: forwarded caller contract; `st` is null or writable.
    unsafe {
        with_handle(r, |r| match (c_path(path), st.as_mut()) {
            (Ok(path), Some(st)) => syscalls().stat_r(r, path, st),
            (Err(err), _) => fault(r, err, -1),
            (_, None) => fault(r, Errno::EFAULT, -1),
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _fstat_r(r: *mut Reent, fd: Fd, st: *mut Stat) -> c_int {
    // SAFETY: forwarded caller contract; `st` is null or writable.
    unsafe {
        with_handle(r, |r| match st.as_mut() {
            Some(st) => syscalls().fstat_r(r, fd, st),
            None => fault(r, Errno::EFAULT, -1),
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _link_r(r: *mut Reent, existing: *const c_char, new: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_handle(r, |r| match (c_path(existing), c_path(new)) {
            (Ok(existing), Ok(new)) => syscalls().link_r(r, existing, new),
            (Err(err), _) | (_, Err(err)) => fault(r, err, -1),
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _unlink_r(r: *mut Reent, path: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe {
        with_handle(r, |r| match c_path(path) {
            Ok(path) => syscalls().unlink_r(r, path),
            Err(err) => fault(r, err, -1),
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _kill_r(r: *mut Reent, pid: Pid, sig: c_int) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { with_handle(r, |r| syscalls().kill_r(r, pid, sig)) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _getpid_r(r: *mut Reent) -> Pid {
    // SAFETY: forwarded caller contract.
    unsafe { with_handle(r, |r| syscalls().getpid_r(r)) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _sbrk_r(r: *mut Reent, increment: isize) -> *mut c_void {
    // SAFETY: forwarded caller contract.
    unsafe { with_handle(r, |r| syscalls().sbrk_r(r, increment)) as *mut c_void }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _gettimeofday_r(r: *mut Reent, tv: *mut Timeval, tz: *mut c_void) -> c_int {
    // SAFETY: forwarded caller contract; `tv` and `tz` are null or writable.
    unsafe {
        let tz = tz.cast::<Timezone>().as_mut();
        with_handle(r, |r| syscalls().gettimeofday_r(r, tv.as_mut(), tz))
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _isatty_r(r: *mut Reent, fd: Fd) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { with_handle(r, |r| syscalls().isatty_r(r, fd)) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn _times_r(r: *mut Reent, buf: *mut Tms) -> Clock {
    // SAFETY: forwarded caller contract; `buf` is null or writable.
    unsafe {
        with_handle(r, |r| match buf.as_mut() {
            Some(buf) => syscalls().times_r(r, buf),
            None => fault(r, Errno::EFAULT, -1),
        })
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn read(fd: Fd, buf: *mut c_void, cnt: usize) -> isize {
    // SAFETY: forwarded caller contract.
    unsafe { _read_r(core::ptr::null_mut(), fd, buf, cnt) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn write(fd: Fd, buf: *const c_void, cnt: usize) -> isize {
    // SAFETY: forwarded caller contract.
    unsafe { _write_r(core::ptr::null_mut(), fd, buf, cnt) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn open(path: *const c_char, flags: c_int, mode: c_int) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { _open_r(core::ptr::null_mut(), path, flags, mode) }
}

#[unsafe(no_mangle)]
pub extern "C" fn close(fd: Fd) -> c_int {
    connector::close(fd)
}

#[unsafe(no_mangle)]
pub extern "C" fn lseek(fd: Fd, offset: Off, whence: c_int) -> Off {
    connector::lseek(fd, offset, whence)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn stat(path: *const c_char, st: *mut Stat) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { _stat_r(core::ptr::null_mut(), path, st) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn fstat(fd: Fd, st: *mut Stat) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { _fstat_r(core::ptr::null_mut(), fd, st) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn link(existing: *const c_char, new: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { _link_r(core::ptr::null_mut(), existing, new) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn unlink(path: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { _unlink_r(core::ptr::null_mut(), path) }
}

#[unsafe(no_mangle)]
pub extern "C" fn kill(pid: Pid, sig: c_int) -> c_int {
    connector::kill(pid, sig)
}

#[unsafe(no_mangle)]
pub extern "C" fn getpid() -> Pid {
    connector::getpid()
}

#[unsafe(no_mangle)]
pub extern "C" fn sbrk(increment: isize) -> *mut c_void {
    connector::sbrk(increment) as *mut c_void
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn gettimeofday(tv: *mut Timeval, tz: *mut c_void) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { _gettimeofday_r(core::ptr::null_mut(), tv, tz) }
}

#[unsafe(no_mangle)]
pub extern "C" fn isatty(fd: Fd) -> c_int {
    connector::isatty(fd)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn times(buf: *mut Tms) -> Clock {
    // SAFETY: forwarded caller contract.
    unsafe { _times_r(core::ptr::null_mut(), buf) }
}

#[unsafe(no_mangle)]
pub extern "C" fn _exit(status: c_int) -> ! {
    connector::_exit(status)
}

#[unsafe(no_mangle)]
pub extern "C" fn __chk_fail() -> ! {
    crate::fortify::chk_fail()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn getentropy(buf: *mut c_void, len: usize) -> c_int {
    // SAFETY: caller contract.
    match unsafe { c_bytes_mut(buf, len) } {
        Ok(buf) => connector::getentropy(buf),
        Err(err) => with_reent(|r| fault(r, err, -1)),
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn pthread_setcancelstate(state: c_int, old: *mut c_int) -> c_int {
    // SAFETY: `old` is null or writable.
    crate::stubs::pthread_setcancelstate(state, unsafe { old.as_mut() })
}
