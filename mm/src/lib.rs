//! Heap bootstrap for the gloss runtime: the `sbrk` cursor and the static
//! arenas and link-time symbols that bound it.

#![no_std]

pub mod heap;
#[cfg(feature = "linker-symbols")]
pub mod symbols;

pub use heap::{Heap, HeapArena, HeapConfig, HeapStats};

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod tests;
