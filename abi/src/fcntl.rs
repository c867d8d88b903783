//! `open(2)` flags and `fcntl(2)` commands, newlib `<sys/_default_fcntl.h>` values.

use core::ffi::c_int;

use bitflags::bitflags;

pub const O_RDONLY: c_int = 0x0000;
pub const O_WRONLY: c_int = 0x0001;
pub const O_RDWR: c_int = 0x0002;
pub const O_ACCMODE: c_int = 0x0003;

bitflags! {
    /// Flags accepted by `open`. The access mode lives in the low two bits
    /// and is read through [`OpenFlags::access_mode`].
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: c_int {
        const WRONLY = O_WRONLY;
        const RDWR = O_RDWR;
        const APPEND = 0x0008;
        const CREAT = 0x0200;
        const TRUNC = 0x0400;
        const EXCL = 0x0800;
        const SYNC = 0x2000;
        const NONBLOCK = 0x4000;
        const NOCTTY = 0x8000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    #[inline]
    pub fn can_read(self) -> bool {
        !matches!(self, Self::WriteOnly)
    }

    #[inline]
    pub fn can_write(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

impl OpenFlags {
    /// Decode raw `open` flags, keeping bits this table doesn't name.
    #[inline]
    pub fn from_c_int(raw: c_int) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Access mode from the low bits; the reserved value 3 reads as `O_RDWR`.
    pub fn access_mode(self) -> AccessMode {
        match self.bits() & O_ACCMODE {
            O_RDONLY => AccessMode::ReadOnly,
            O_WRONLY => AccessMode::WriteOnly,
            _ => AccessMode::ReadWrite,
        }
    }
}

// fcntl commands
pub const F_DUPFD: c_int = 0;
pub const F_GETFD: c_int = 1;
pub const F_SETFD: c_int = 2;
pub const F_GETFL: c_int = 3;
pub const F_SETFL: c_int = 4;

pub const FD_CLOEXEC: c_int = 1;
