use crate::heap::HeapConfig;

/// Heap bounds published by the link script, isolated here so other modules
/// avoid raw `extern "C"` declarations.
mod externs {
    unsafe extern "C" {
        /// End of static data; the heap starts here.
        #[link_name = "end"]
        pub(crate) static HEAP_START: u8;
        /// Top of memory available to the heap.
        #[link_name = "__heap_limit"]
        pub(crate) static HEAP_LIMIT: u8;
    }
}

#[inline]
pub fn heap_bounds() -> (*const u8, *const u8) {
    (
        &raw const externs::HEAP_START,
        &raw const externs::HEAP_LIMIT,
    )
}

impl HeapConfig {
    /// Bounded config from the `end` and `__heap_limit` link-time symbols.
    pub fn from_linker() -> Self {
        let (start, limit) = heap_bounds();
        HeapConfig::new(start as usize, limit as usize).with_align(8)
    }
}
