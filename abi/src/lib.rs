//! gloss ABI types
//!
//! Canonical definitions for everything that crosses the boundary between
//! the C runtime and a syscall target: error codes, `open` flags, `stat`,
//! time structures and signal numbers. Having one source of truth keeps the
//! runtime, the targets and the C ABI exports from drifting apart.
//!
//! All structures are `#[repr(C)]` for ABI stability.

#![no_std]
#![forbid(unsafe_code)]

pub mod error;
pub mod fcntl;
pub mod signal;
pub mod stat;
pub mod time;
pub mod unistd;

pub use error::*;
pub use fcntl::*;
pub use stat::*;
pub use time::*;
pub use unistd::*;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod tests;
