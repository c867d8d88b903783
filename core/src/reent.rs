//! Per-context handle and ambient lookup.
//!
//! Every library call that can fail writes its error code into a [`Reent`]
//! rather than a process-wide `errno`. The `_r` layer takes the handle as an
//! argument; the connectors fetch the ambient one through [`with_reent`]:
//!
//! 1. the host's context service, when one is registered;
//! 2. under `std`, a handle local to the calling thread;
//! 3. otherwise the single impure handle shared by a single-threaded target.
//!
//! `with_reent` must not be re-entered from inside its own closure.

use core::ffi::c_int;

use gloss_abi::{Errno, SysResult};
use spin::Mutex;

pub const STAGING_SIZE: usize = 128;
pub const DEFAULT_LOCALE: &str = "C";

/// C `struct _reent`; `errno` comes first.
#[repr(C)]
pub struct Reent {
    errno: c_int,
    staging: [u8; STAGING_SIZE],
    locale: &'static str,
}

impl Reent {
    pub const fn new() -> Self {
        Self {
            errno: 0,
            staging: [0; STAGING_SIZE],
            locale: DEFAULT_LOCALE,
        }
    }

    /// Last recorded error, `None` while the slot is clear.
    #[inline]
    pub fn errno(&self) -> Option<Errno> {
        (self.errno != 0).then(|| Errno::from_raw(self.errno))
    }

    #[inline]
    pub fn errno_raw(&self) -> c_int {
        self.errno
    }

    #[inline]
    pub fn set_errno(&mut self, err: Errno) {
        self.errno = err.as_c_int();
    }

    #[inline]
    pub fn clear_errno(&mut self) {
        self.errno = 0;
    }

    /// Map a primitive's result onto the C convention: the value on success,
    /// otherwise `sentinel` with the error recorded. Success leaves the slot alone.
    #[inline]
    pub fn complete<T>(&mut self, result: SysResult<T>, sentinel: T) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.set_errno(err);
                sentinel
            }
        }
    }

    /// Scratch space for formatted I/O.
    pub fn staging(&mut self) -> &mut [u8; STAGING_SIZE] {
        &mut self.staging
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    pub fn set_locale(&mut self, locale: &'static str) {
        self.locale = locale;
    }

    #[cfg(feature = "c-abi")]
    pub(crate) fn errno_ptr(&mut self) -> *mut c_int {
        &mut self.errno
    }
}

impl Default for Reent {
    fn default() -> Self {
        Self::new()
    }
}

gloss_lib::define_service! {
    /// Lookup of the calling context's handle on multi-threaded hosts.
    context => ContextServices {
        /// Run the callback on the current context's handle.
        @no_wrapper with_current(f: &mut dyn FnMut(&mut Reent));
    }
}

static IMPURE: Mutex<Reent> = Mutex::new(Reent::new());

#[cfg(any(feature = "std", test))]
std::thread_local! {
    static THREAD_REENT: core::cell::RefCell<Reent> = const { core::cell::RefCell::new(Reent::new()) };
}

/// Run `f` on the ambient handle of the calling context.
pub fn with_reent<R>(f: impl FnOnce(&mut Reent) -> R) -> R {
    let Some(services) = try_context_services() else {
        return with_local(f);
    };
    let mut f = Some(f);
    let mut out = None;
    (services.with_current)(&mut |reent: &mut Reent| {
        if let Some(f) = f.take() {
            out = Some(f(reent));
        }
    });
    match (out, f) {
        (Some(out), _) => out,
        // The host never ran the callback.
        (None, Some(f)) => with_local(f),
        (None, None) => unreachable!("context callback ran without producing a result"),
    }
}

#[cfg(any(feature = "std", test))]
fn with_local<R>(f: impl FnOnce(&mut Reent) -> R) -> R {
    THREAD_REENT.with(|cell| f(&mut *cell.borrow_mut()))
}

#[cfg(not(any(feature = "std", test)))]
fn with_local<R>(f: impl FnOnce(&mut Reent) -> R) -> R {
    f(&mut *IMPURE.lock())
}

/// Run `f` on the process-wide impure handle regardless of context.
pub fn with_impure<R>(f: impl FnOnce(&mut Reent) -> R) -> R {
    f(&mut *IMPURE.lock())
}

/// Error recorded on the ambient handle.
pub fn errno() -> Option<Errno> {
    with_reent(|r| r.errno())
}

pub fn set_errno(err: Errno) {
    with_reent(|r| r.set_errno(err))
}

pub fn clear_errno() {
    with_reent(|r| r.clear_errno())
}
