//! Error codes shared by every syscall target.
//!
//! Numbering is newlib's `<sys/errno.h>`, the same convention as the `open`
//! flags in [`crate::fcntl`], so values written into a context handle can be
//! handed straight to C callers built against newlib. Codes below 35 agree
//! with Linux; `ENAMETOOLONG`, `ENOSYS`, `ENOTEMPTY` and `EOVERFLOW` do not.

use core::ffi::c_int;
use core::fmt;

/// Implement the integer conversions and message table for an errno enum.
///
/// Generates `as_c_int()`, `from_raw()` and `message()` for a `#[repr(i32)]`
/// enum. Raw values without a variant collapse to `$fallback`.
macro_rules! impl_errno {
    ($ty:ty, fallback: $fallback:ident, variants: { $($val:literal => $variant:ident : $msg:literal),* $(,)? }) => {
        impl $ty {
            /// Convert to the C-style integer stored in `errno`.
            #[inline]
            pub fn as_c_int(self) -> c_int {
                self as c_int
            }

            /// Convert from a raw errno value.
            #[inline]
            pub fn from_raw(val: c_int) -> Self {
                match val {
                    $($val => Self::$variant,)*
                    _ => Self::$fallback,
                }
            }

            /// The `strerror` text for this code.
            pub fn message(self) -> &'static str {
                match self {
                    $(Self::$variant => $msg,)*
                }
            }
        }
    };
}

/// Result of a syscall primitive.
pub type SysResult<T> = Result<T, Errno>;

/// POSIX error numbers.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Errno {
    /// Operation not permitted
    EPERM = 1,
    /// No such file or directory
    ENOENT = 2,
    /// No such process
    ESRCH = 3,
    /// Interrupted system call
    EINTR = 4,
    /// I/O error
    EIO = 5,
    /// No such device or address
    ENXIO = 6,
    /// Argument list too long
    E2BIG = 7,
    /// Exec format error
    ENOEXEC = 8,
    /// Bad file descriptor
    EBADF = 9,
    /// No child processes
    ECHILD = 10,
    /// Resource temporarily unavailable
    EAGAIN = 11,
    /// Out of memory
    ENOMEM = 12,
    /// Permission denied
    EACCES = 13,
    /// Bad address
    EFAULT = 14,
    /// Device or resource busy
    EBUSY = 16,
    /// File exists
    EEXIST = 17,
    /// Cross-device link
    EXDEV = 18,
    /// No such device
    ENODEV = 19,
    /// Not a directory
    ENOTDIR = 20,
    /// Is a directory
    EISDIR = 21,
    /// Invalid argument
    EINVAL = 22,
    /// Too many open files in system
    ENFILE = 23,
    /// Too many open files
    EMFILE = 24,
    /// Not a typewriter
    ENOTTY = 25,
    /// File too large
    EFBIG = 27,
    /// No space left on device
    ENOSPC = 28,
    /// Illegal seek
    ESPIPE = 29,
    /// Read-only file system
    EROFS = 30,
    /// Too many links
    EMLINK = 31,
    /// Broken pipe
    EPIPE = 32,
    /// Result out of range
    ERANGE = 34,
    /// File name too long
    ENAMETOOLONG = 91,
    /// Function not implemented
    ENOSYS = 88,
    /// Directory not empty
    ENOTEMPTY = 90,
    /// Value too large for defined data type
    EOVERFLOW = 139,
}

impl_errno!(Errno, fallback: EINVAL, variants: {
    1 => EPERM: "Operation not permitted",
    2 => ENOENT: "No such file or directory",
    3 => ESRCH: "No such process",
    4 => EINTR: "Interrupted system call",
    5 => EIO: "Input/output error",
    6 => ENXIO: "No such device or address",
    7 => E2BIG: "Argument list too long",
    8 => ENOEXEC: "Exec format error",
    9 => EBADF: "Bad file descriptor",
    10 => ECHILD: "No child processes",
    11 => EAGAIN: "Resource temporarily unavailable",
    12 => ENOMEM: "Cannot allocate memory",
    13 => EACCES: "Permission denied",
    14 => EFAULT: "Bad address",
    16 => EBUSY: "Device or resource busy",
    17 => EEXIST: "File exists",
    18 => EXDEV: "Invalid cross-device link",
    19 => ENODEV: "No such device",
    20 => ENOTDIR: "Not a directory",
    21 => EISDIR: "Is a directory",
    22 => EINVAL: "Invalid argument",
    23 => ENFILE: "Too many open files in system",
    24 => EMFILE: "Too many open files",
    25 => ENOTTY: "Inappropriate ioctl for device",
    27 => EFBIG: "File too large",
    28 => ENOSPC: "No space left on device",
    29 => ESPIPE: "Illegal seek",
    30 => EROFS: "Read-only file system",
    31 => EMLINK: "Too many links",
    32 => EPIPE: "Broken pipe",
    34 => ERANGE: "Numerical result out of range",
    91 => ENAMETOOLONG: "File name too long",
    88 => ENOSYS: "Function not implemented",
    90 => ENOTEMPTY: "Directory not empty",
    139 => EOVERFLOW: "Value too large for defined data type",
});

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// `strerror` over a raw value; 0 reads as success.
pub fn strerror(errnum: c_int) -> &'static str {
    match errnum {
        0 => "Success",
        n if Errno::from_raw(n).as_c_int() == n => Errno::from_raw(n).message(),
        _ => "Unknown error",
    }
}
