//! Concurrent disjointness and accounting stress tests.
//!
//! Two writers hammer one arena with a million allocations each; the
//! address sets they observe must not intersect, for both the plain and
//! the aligned path. A third test reads the usage accountant while
//! writers run and checks it only ever moves up.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use silt_arena::Arena;

const ALLOCS_PER_THREAD: usize = 1_000_000;
const ALLOC_SIZE: usize = 100;

fn collect_addresses(arena: &Arena, aligned: bool) -> HashSet<usize> {
    let mut addresses = HashSet::with_capacity(ALLOCS_PER_THREAD);
    for _ in 0..ALLOCS_PER_THREAD {
        let region = if aligned {
            arena.alloc_aligned(ALLOC_SIZE)
        } else {
            arena.alloc(ALLOC_SIZE)
        }
        .unwrap();
        addresses.insert(region.as_ptr() as usize);
    }
    addresses
}

fn two_writers_get_disjoint_ranges(aligned: bool) {
    let arena = Arena::new();
    let (ours, theirs) = thread::scope(|s| {
        let a = s.spawn(|| collect_addresses(&arena, aligned));
        let b = s.spawn(|| collect_addresses(&arena, aligned));
        (a.join().unwrap(), b.join().unwrap())
    });
    // No address granted twice within a thread, nor across threads.
    assert_eq!(ours.len(), ALLOCS_PER_THREAD);
    assert_eq!(theirs.len(), ALLOCS_PER_THREAD);
    assert!(ours.is_disjoint(&theirs));
}

#[test]
fn concurrent_allocations_never_overlap() {
    two_writers_get_disjoint_ranges(false);
}

#[test]
fn concurrent_aligned_allocations_never_overlap() {
    two_writers_get_disjoint_ranges(true);
}

#[test]
fn usage_is_monotonic_while_writers_run() {
    let arena = Arena::new();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let writers: Vec<_> = (0..2)
            .map(|_| {
                s.spawn(|| {
                    for _ in 0..100_000 {
                        arena.alloc(64).unwrap();
                    }
                })
            })
            .collect();

        let reader = s.spawn(|| {
            let mut last = 0usize;
            while !done.load(Ordering::Acquire) {
                let usage = arena.memory_usage();
                assert!(usage >= last, "usage accounting moved backwards");
                last = usage;
            }
            last
        });

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
        let observed = reader.join().unwrap();
        assert!(arena.memory_usage() >= observed);
    });

    // Capacities reserved must cover every byte requested.
    assert!(arena.memory_usage() >= 2 * 100_000 * 64);
}
