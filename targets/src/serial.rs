//! Console-only bare-metal board.
//!
//! Descriptors 0-2 are the serial line; the heap is a bump cursor over
//! whatever range the board was given. Every other primitive keeps the
//! `ENOSYS` default.

use core::ffi::c_int;

use gloss_abi::{Errno, Fd, STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO, Stat, SysResult};
use gloss_core::SyscallProvider;
use gloss_lib::{KlogSink, klog_info};
use gloss_mm::{Heap, HeapConfig, HeapStats};
use spin::Mutex;

/// A byte-level serial line.
pub trait SerialLine: Send {
    fn send(&mut self, byte: u8);
    /// Block until a byte arrives.
    fn receive(&mut self) -> u8;
}

pub struct SerialBoard<L: SerialLine> {
    line: Mutex<L>,
    heap: Mutex<Heap>,
}

fn send_translated<L: SerialLine>(line: &mut L, bytes: &[u8]) {
    for &byte in bytes {
        if byte == b'\n' {
            line.send(b'\r');
        }
        line.send(byte);
    }
}

impl<L: SerialLine> SerialBoard<L> {
    pub const fn new(line: L, heap: HeapConfig) -> Self {
        Self {
            line: Mutex::new(line),
            heap: Mutex::new(Heap::new(heap)),
        }
    }

    pub fn heap_stats(&self) -> HeapStats {
        self.heap.lock().stats()
    }

    /// Run `f` with exclusive access to the line.
    pub fn with_line<R>(&self, f: impl FnOnce(&mut L) -> R) -> R {
        f(&mut *self.line.lock())
    }
}

impl<L: SerialLine> SyscallProvider for SerialBoard<L> {
    /// Line-oriented read: stops after a newline (a carriage return counts
    /// and is stored as `\n`) or when `buf` is full.
    fn read(&self, fd: Fd, buf: &mut [u8]) -> SysResult<usize> {
        if fd != STDIN_FILENO {
            return Err(Errno::EBADF);
        }
        let mut line = self.line.lock();
        let mut n = 0;
        while n < buf.len() {
            let byte = match line.receive() {
                b'\r' => b'\n',
                other => other,
            };
            buf[n] = byte;
            n += 1;
            if byte == b'\n' {
                break;
            }
        }
        Ok(n)
    }

    fn write(&self, fd: Fd, buf: &[u8]) -> SysResult<usize> {
        if fd != STDOUT_FILENO && fd != STDERR_FILENO {
            return Err(Errno::EBADF);
        }
        send_translated(&mut *self.line.lock(), buf);
        Ok(buf.len())
    }

    fn close(&self, fd: Fd) -> SysResult<()> {
        match fd {
            STDIN_FILENO | STDOUT_FILENO | STDERR_FILENO => Ok(()),
            _ => Err(Errno::EBADF),
        }
    }

    fn fstat(&self, fd: Fd) -> SysResult<Stat> {
        match fd {
            STDIN_FILENO | STDOUT_FILENO | STDERR_FILENO => Ok(Stat::char_device()),
            _ => Err(Errno::EBADF),
        }
    }

    fn isatty(&self, fd: Fd) -> SysResult<bool> {
        match fd {
            STDIN_FILENO | STDOUT_FILENO | STDERR_FILENO => Ok(true),
            _ => Err(Errno::EBADF),
        }
    }

    fn sbrk(&self, increment: isize) -> SysResult<usize> {
        self.heap.lock().sbrk(increment)
    }

    fn exit(&self, status: c_int) -> ! {
        klog_info!("serial: exit({}), halting", status);
        halt()
    }
}

impl<L: SerialLine> KlogSink for SerialBoard<L> {
    fn write_bytes(&self, bytes: &[u8]) {
        send_translated(&mut *self.line.lock(), bytes);
    }
}

#[cfg(target_arch = "x86_64")]
fn halt() -> ! {
    loop {
        x86_64::instructions::interrupts::disable();
        x86_64::instructions::hlt();
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
