//! Placeholders that exist so the upper library links on every target.

use core::ffi::c_int;

use gloss_abi::Errno;

/// Thread cancellation is not supported: returns `ENOSYS` as the result,
/// leaves `old` and the caller's `errno` untouched.
pub fn pthread_setcancelstate(state: c_int, old: Option<&mut c_int>) -> c_int {
    let _ = (state, old);
    Errno::ENOSYS.as_c_int()
}
