//! Fail path for the fortified string and memory routines.

use gloss_abi::STDERR_FILENO;
use gloss_abi::signal::SIGABRT;
use gloss_lib::klog_error;

use crate::connector::{_exit, getpid, kill, write};

pub const CHK_FAIL_MESSAGE: &[u8] = b"*** buffer overflow detected ***: terminated\n";
pub const CHK_FAIL_STATUS: i32 = 127;

/// Report a detected buffer overflow and terminate. Never returns.
pub fn chk_fail() -> ! {
    klog_error!("fortify: buffer overflow detected");
    let _ = write(STDERR_FILENO, CHK_FAIL_MESSAGE);
    let _ = kill(getpid(), SIGABRT);
    _exit(CHK_FAIL_STATUS)
}
