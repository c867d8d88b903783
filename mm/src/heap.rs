//! Program break for targets without a kernel-managed heap.
//!
//! `Heap` is a monotonic bump cursor over an address range handed in as
//! [`HeapConfig`]. It only does arithmetic on addresses: whoever owns the
//! range decides what memory backs it. It is not synchronised; targets
//! that share one across contexts put it behind a lock.

use core::cell::UnsafeCell;

use gloss_abi::{Errno, SysResult};
use gloss_lib::{align_up_usize, klog_debug, klog_warn};

/// Address range and policy for one heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    /// First usable address (end of static data on a linked image).
    pub start: usize,
    /// One past the last usable address; `None` leaves only overflow as a limit.
    pub end: Option<usize>,
    /// Alignment applied to `start` when the cursor is first initialised.
    pub align: usize,
    /// Whether negative increments may hand memory back.
    pub allow_shrink: bool,
}

impl HeapConfig {
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
            align: 1,
            allow_shrink: false,
        }
    }

    pub const fn unbounded(start: usize) -> Self {
        Self {
            start,
            end: None,
            align: 1,
            allow_shrink: false,
        }
    }

    /// `align` must be a power of two.
    pub const fn with_align(mut self, align: usize) -> Self {
        self.align = align;
        self
    }

    pub const fn with_shrink(mut self) -> Self {
        self.allow_shrink = true;
        self
    }

    pub const fn capacity(&self) -> Option<usize> {
        match self.end {
            Some(end) => Some(end.saturating_sub(self.start)),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub grow_calls: u64,
    pub shrink_calls: u64,
    pub failed_calls: u64,
    /// Highest cursor value ever reached.
    pub high_water: usize,
}

pub struct Heap {
    config: HeapConfig,
    // Initial cursor and current cursor, set on the first sbrk.
    base: Option<usize>,
    cursor: usize,
    stats: HeapStats,
}

impl Heap {
    pub const fn new(config: HeapConfig) -> Self {
        Self {
            config,
            base: None,
            cursor: 0,
            stats: HeapStats {
                grow_calls: 0,
                shrink_calls: 0,
                failed_calls: 0,
                high_water: 0,
            },
        }
    }

    fn ensure_cursor(&mut self) -> SysResult<usize> {
        if self.base.is_some() {
            return Ok(self.cursor);
        }
        let Some(base) = align_up_usize(self.config.start, self.config.align) else {
            return Err(Errno::ENOMEM);
        };
        if let Some(end) = self.config.end {
            if base > end {
                return Err(Errno::ENOMEM);
            }
        }
        klog_debug!("heap: cursor initialised at {:#x}", base);
        self.base = Some(base);
        self.cursor = base;
        self.stats.high_water = base;
        Ok(base)
    }

    /// Move the break by `increment` bytes and return the previous break.
    ///
    /// On failure the cursor is left exactly where it was: `ENOMEM` when the
    /// new break would pass the configured end (or overflow), `EINVAL` for a
    /// negative increment the config doesn't allow or that would drop below
    /// the initial break.
    pub fn sbrk(&mut self, increment: isize) -> SysResult<usize> {
        let result = self.try_sbrk(increment);
        if result.is_err() {
            self.stats.failed_calls += 1;
        }
        result
    }

    fn try_sbrk(&mut self, increment: isize) -> SysResult<usize> {
        let previous = self.ensure_cursor()?;
        if increment == 0 {
            return Ok(previous);
        }

        let next = if increment > 0 {
            previous
                .checked_add(increment.unsigned_abs())
                .ok_or(Errno::ENOMEM)?
        } else {
            if !self.config.allow_shrink {
                return Err(Errno::EINVAL);
            }
            let base = self.base.unwrap_or(previous);
            match previous.checked_sub(increment.unsigned_abs()) {
                Some(next) if next >= base => next,
                _ => return Err(Errno::EINVAL),
            }
        };

        if let Some(end) = self.config.end {
            if next > end {
                klog_warn!(
                    "heap: sbrk({}) at {:#x} would pass end {:#x}",
                    increment,
                    previous,
                    end
                );
                return Err(Errno::ENOMEM);
            }
        }

        self.cursor = next;
        if increment > 0 {
            self.stats.grow_calls += 1;
            self.stats.high_water = self.stats.high_water.max(next);
        } else {
            self.stats.shrink_calls += 1;
        }
        Ok(previous)
    }

    /// Current break, or `None` before the first `sbrk`.
    pub fn current(&self) -> Option<usize> {
        self.base.map(|_| self.cursor)
    }

    /// Initial break, or `None` before the first `sbrk`.
    pub fn start(&self) -> Option<usize> {
        self.base
    }

    /// Bytes left before the end; `None` for an unbounded heap.
    pub fn remaining(&self) -> Option<usize> {
        let end = self.config.end?;
        let cursor = match self.base {
            Some(_) => self.cursor,
            None => align_up_usize(self.config.start, self.config.align)?,
        };
        Some(end.saturating_sub(cursor))
    }

    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    pub fn stats(&self) -> HeapStats {
        self.stats
    }
}

/// Statically allocated backing memory for a [`Heap`].
#[repr(C, align(16))]
pub struct HeapArena<const N: usize> {
    bytes: UnsafeCell<[u8; N]>,
}

// SAFETY: the arena never touches its bytes after construction. It only
// publishes its address range; the heap cursor hands disjoint pieces of it
// to callers, who access them through raw pointers.
unsafe impl<const N: usize> Sync for HeapArena<N> {}

impl<const N: usize> HeapArena<N> {
    pub const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new([0; N]),
        }
    }

    pub const fn size(&self) -> usize {
        N
    }

    /// Bounded config covering exactly this arena.
    pub fn config(&'static self) -> HeapConfig {
        let start = self.bytes.get() as usize;
        HeapConfig::new(start, start + N).with_align(16)
    }
}

impl<const N: usize> Default for HeapArena<N> {
    fn default() -> Self {
        Self::new()
    }
}
