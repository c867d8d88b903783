//! Time types used by `gettimeofday` and `times`.

use core::ffi::c_int;

pub type Time = i64;
pub type Clock = i64;
pub type Suseconds = i64;

/// Ticks per second reported by `times`.
pub const CLOCKS_PER_SEC: Clock = 1000;

pub const USEC_PER_SEC: i64 = 1_000_000;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timeval {
    pub tv_sec: Time,
    pub tv_usec: Suseconds,
}

impl Timeval {
    pub const fn from_micros(micros: u64) -> Self {
        Self {
            tv_sec: (micros / USEC_PER_SEC as u64) as Time,
            tv_usec: (micros % USEC_PER_SEC as u64) as Suseconds,
        }
    }

    pub const fn as_micros(&self) -> i64 {
        self.tv_sec * USEC_PER_SEC + self.tv_usec
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timezone {
    pub tz_minuteswest: c_int,
    pub tz_dsttime: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tms {
    pub tms_utime: Clock,
    pub tms_stime: Clock,
    pub tms_cutime: Clock,
    pub tms_cstime: Clock,
}
