//! Descriptor constants, `lseek` whence and process id types.

use core::ffi::c_int;

use crate::error::{Errno, SysResult};

/// An open stream at the syscall level. The runtime never interprets the bits.
pub type Fd = c_int;
pub type Pid = c_int;

pub const STDIN_FILENO: Fd = 0;
pub const STDOUT_FILENO: Fd = 1;
pub const STDERR_FILENO: Fd = 2;

pub const SEEK_SET: c_int = 0;
pub const SEEK_CUR: c_int = 1;
pub const SEEK_END: c_int = 2;

/// Largest request `getentropy` accepts.
pub const GETENTROPY_MAX: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Set,
    Cur,
    End,
}

impl Whence {
    pub fn from_c_int(raw: c_int) -> SysResult<Self> {
        match raw {
            SEEK_SET => Ok(Self::Set),
            SEEK_CUR => Ok(Self::Cur),
            SEEK_END => Ok(Self::End),
            _ => Err(Errno::EINVAL),
        }
    }

    pub fn as_c_int(self) -> c_int {
        match self {
            Self::Set => SEEK_SET,
            Self::Cur => SEEK_CUR,
            Self::End => SEEK_END,
        }
    }
}

/// `pthread_setcancelstate` states.
pub const PTHREAD_CANCEL_ENABLE: c_int = 0;
pub const PTHREAD_CANCEL_DISABLE: c_int = 1;
