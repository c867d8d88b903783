//! gloss support library
//!
//! Ambient pieces shared by every gloss crate: the leveled runtime log,
//! single-registration service cells and the `define_service!` macro used
//! to late-bind host hooks, plus small alignment helpers.

#![no_std]

pub mod alignment;
pub mod klog;
pub mod service_cell;
pub mod service_macro;

pub use alignment::{align_down_usize, align_up_usize};
pub use klog::{
    KlogLevel, KlogSink, klog_attach_sink, klog_get_level, klog_has_sink, klog_init,
    klog_set_level,
};
pub use service_cell::ServiceCell;

#[doc(hidden)]
pub use paste;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod tests;
