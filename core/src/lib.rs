//! gloss core: the reentrant syscall layer.
//!
//! Upper-library code calls the POSIX names in [`connector`]; those find
//! the calling context's [`Reent`] and forward to the `_r` form of whatever
//! [`SyscallProvider`] the target registered. Without a registration every
//! call lands on [`NoSys`] and fails with `ENOSYS`.

#![no_std]

pub mod connector;
pub mod fortify;
pub mod provider;
pub mod reent;
pub mod reentrant;
pub mod stdio;
pub mod stubs;

#[cfg(feature = "c-abi")]
pub mod ffi;

pub use connector::*;
pub use fortify::chk_fail;
pub use provider::{NoSys, SyscallProvider, is_syscalls_registered, register_syscalls, syscalls};
pub use reent::{
    ContextServices, Reent, clear_errno, errno, is_context_initialized,
    register_context_services, set_errno, with_impure, with_reent,
};
pub use reentrant::{Reentrant, SBRK_FAILED};
pub use stdio::{BufferMode, Stream, stderr, stdout};
pub use stubs::pthread_setcancelstate;

#[cfg(any(feature = "std", test))]
extern crate std;
