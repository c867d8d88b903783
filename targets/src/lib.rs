//! Concrete syscall providers.
//!
//! [`SimBoard`] is a hosted simulator: console queues, an in-memory
//! filesystem, a simulated clock and a heap carved from an owned buffer.
//! [`SerialBoard`] is the usual bare-metal board: a console on a serial
//! line, a bump heap, and `ENOSYS` for everything else.

#![no_std]

extern crate alloc;

pub mod serial;
pub mod sim;

#[cfg(target_arch = "x86_64")]
pub mod uart;

pub use serial::{SerialBoard, SerialLine};
pub use sim::{SimBoard, SimConfig};

#[cfg(target_arch = "x86_64")]
pub use uart::Uart16550;

#[cfg(test)]
extern crate std;
