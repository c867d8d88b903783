//! In-memory filesystem and descriptor table for hosted targets.

#![no_std]

extern crate alloc;

pub mod fileio;
pub mod ramfs;

pub use fileio::{FileTable, MAX_OPEN_FILES, OpenFile};
pub use ramfs::{MAX_FILE_SIZE, MAX_PATH, RamFs, ROOT_INO};

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod tests;
