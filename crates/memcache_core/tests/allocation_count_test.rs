//! Cache hits and frees must not reach the system allocator.
//!
//! Installs a counting global allocator. Counts are kept per thread so the
//! test harness's own allocations on other threads do not interfere.

#![allow(unsafe_code)]

use memcache_core::MemCache;
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

struct CountingAllocator;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn bump() {
    // `try_with` because the allocator also runs during thread teardown.
    let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
}

// SAFETY: every call is forwarded unchanged to the system allocator.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        bump();
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        bump();
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        bump();
        unsafe { System.realloc(ptr, layout, new_size) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn allocations() -> usize {
    ALLOCATIONS.with(Cell::get)
}

#[test]
fn test_round_trip_needs_no_system_allocation() {
    let pool = MemCache::create();

    // Warm up every code path once on an unrelated size.
    let warm = pool.alloc(32).unwrap();
    pool.free(warm).unwrap();
    let warm = pool.alloc(32).unwrap();
    pool.free(warm).unwrap();

    // Miss: allocates a bucket and a node.
    let before_miss = allocations();
    let block = pool.alloc(64).unwrap();
    assert!(allocations() > before_miss);
    let addr = block.as_ptr();

    // free + hit: nothing.
    let before = allocations();
    pool.free(block).unwrap();
    let block = pool.alloc(64).unwrap();
    assert_eq!(allocations(), before);
    assert_eq!(block.as_ptr(), addr);

    // Many cycles: still nothing.
    let before = allocations();
    let mut block = block;
    for _ in 0..10_000 {
        pool.free(block).unwrap();
        block = pool.alloc(64).unwrap();
    }
    assert_eq!(allocations(), before);
    assert_eq!(block.as_ptr(), addr);

    block.release();
    let report = pool.destroy();
    assert_eq!(report.bucket_count(), 2);
    assert_eq!(report.cached_nodes(), 2);
}
