use std::vec::Vec;

use gloss_abi::Errno;

use crate::heap::{Heap, HeapArena, HeapConfig};

#[test]
fn bounded_heap_rejects_without_moving_cursor() {
    let mut heap = Heap::new(HeapConfig::new(0, 1024));
    assert_eq!(heap.current(), None);

    assert_eq!(heap.sbrk(600), Ok(0));
    assert_eq!(heap.current(), Some(600));

    assert_eq!(heap.sbrk(600), Err(Errno::ENOMEM));
    assert_eq!(heap.current(), Some(600));

    assert_eq!(heap.sbrk(400), Ok(600));
    assert_eq!(heap.current(), Some(1000));
    assert_eq!(heap.remaining(), Some(24));

    let stats = heap.stats();
    assert_eq!(stats.grow_calls, 2);
    assert_eq!(stats.failed_calls, 1);
    assert_eq!(stats.high_water, 1000);
}

#[test]
fn growth_regions_are_increasing_and_disjoint() {
    let mut heap = Heap::new(HeapConfig::new(0x1000, 0x2000));
    let sizes = [16usize, 1, 0, 255, 64, 0, 3];
    let mut regions: Vec<(usize, usize)> = Vec::new();
    for &size in &sizes {
        let base = heap.sbrk(size as isize).unwrap();
        if let Some(&(prev_base, prev_len)) = regions.last() {
            assert!(base >= prev_base + prev_len);
        }
        for &(other, len) in &regions {
            assert!(base >= other + len || base + size <= other);
        }
        if size > 0 {
            regions.push((base, size));
        }
    }
    let bases: Vec<usize> = regions.iter().map(|&(b, _)| b).collect();
    assert!(bases.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn zero_increment_reports_break() {
    let mut heap = Heap::new(HeapConfig::new(64, 128));
    assert_eq!(heap.sbrk(0), Ok(64));
    assert_eq!(heap.sbrk(8), Ok(64));
    assert_eq!(heap.sbrk(0), Ok(72));
}

#[test]
fn exact_fit_to_end_succeeds() {
    let mut heap = Heap::new(HeapConfig::new(0, 256));
    assert_eq!(heap.sbrk(256), Ok(0));
    assert_eq!(heap.remaining(), Some(0));
    assert_eq!(heap.sbrk(1), Err(Errno::ENOMEM));
}

#[test]
fn start_is_aligned_on_first_use() {
    let mut heap = Heap::new(HeapConfig::new(0x1003, 0x2000).with_align(16));
    assert_eq!(heap.remaining(), Some(0x2000 - 0x1010));
    assert_eq!(heap.sbrk(4), Ok(0x1010));
    // Later breaks are not re-aligned.
    assert_eq!(heap.sbrk(4), Ok(0x1014));
}

#[test]
fn aligned_start_past_end_is_out_of_memory() {
    let mut heap = Heap::new(HeapConfig::new(0x1001, 0x1008).with_align(16));
    assert_eq!(heap.sbrk(0), Err(Errno::ENOMEM));
    assert_eq!(heap.current(), None);
}

#[test]
fn shrinking_requires_opt_in() {
    let mut heap = Heap::new(HeapConfig::new(0, 512));
    heap.sbrk(128).unwrap();
    assert_eq!(heap.sbrk(-64), Err(Errno::EINVAL));
    assert_eq!(heap.current(), Some(128));

    let mut heap = Heap::new(HeapConfig::new(0, 512).with_shrink());
    heap.sbrk(128).unwrap();
    assert_eq!(heap.sbrk(-64), Ok(128));
    assert_eq!(heap.current(), Some(64));
    assert_eq!(heap.sbrk(-65), Err(Errno::EINVAL));
    assert_eq!(heap.current(), Some(64));
    assert_eq!(heap.stats().shrink_calls, 1);
}

#[test]
fn unbounded_heap_only_fails_on_overflow() {
    let mut heap = Heap::new(HeapConfig::unbounded(usize::MAX - 16));
    assert_eq!(heap.remaining(), None);
    assert_eq!(heap.sbrk(16), Ok(usize::MAX - 16));
    assert_eq!(heap.sbrk(1), Err(Errno::ENOMEM));
    assert_eq!(heap.current(), Some(usize::MAX));
}

static ARENA: HeapArena<256> = HeapArena::new();

#[test]
fn arena_config_covers_its_storage() {
    let config = ARENA.config();
    assert_eq!(config.start % 16, 0);
    assert_eq!(config.capacity(), Some(ARENA.size()));

    let mut heap = Heap::new(config);
    let first = heap.sbrk(100).unwrap();
    let second = heap.sbrk(100).unwrap();
    assert_eq!(first, config.start);
    assert_eq!(second, first + 100);
    assert_eq!(heap.sbrk(100), Err(Errno::ENOMEM));

    // The handed-out range is real, writable memory.
    unsafe {
        core::ptr::write_bytes(first as *mut u8, 0xAB, 200);
        assert_eq!(*((second + 99) as *const u8), 0xAB);
    }
}
