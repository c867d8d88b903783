//! Signal numbers understood by `kill`.

use core::ffi::c_int;

pub const SIGHUP: c_int = 1;
pub const SIGINT: c_int = 2;
pub const SIGQUIT: c_int = 3;
pub const SIGILL: c_int = 4;
pub const SIGTRAP: c_int = 5;
pub const SIGABRT: c_int = 6;
pub const SIGFPE: c_int = 8;
pub const SIGKILL: c_int = 9;
pub const SIGSEGV: c_int = 11;
pub const SIGPIPE: c_int = 13;
pub const SIGALRM: c_int = 14;
pub const SIGTERM: c_int = 15;

/// One past the highest signal number.
pub const NSIG: c_int = 32;

/// `kill(pid, 0)` probes for existence without delivering anything.
#[inline]
pub fn is_valid_signal(sig: c_int) -> bool {
    (0..NSIG).contains(&sig)
}
