//! Benchmark workloads for the silt arena allocator.
//!
//! Provides deterministic request-size sequences so benches measure the
//! allocator, not an RNG. The mix mirrors a write buffer: mostly tiny
//! node records, occasional medium keys, rare values past the
//! dedicated-block cutover.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Build a deterministic write-buffer-like sequence of request sizes.
///
/// Roughly 90% of entries are 1–32 bytes, 9% are 33–512 bytes, and 1%
/// are 1100–3100 bytes (past the default dedicated-block cutover). Same
/// `seed` and `count` always yield the same sequence.
pub fn mixed_sizes(count: usize, seed: u64) -> Vec<usize> {
    let mut sizes = Vec::with_capacity(count);
    for i in 0..count as u64 {
        // Deterministic pseudo-random draw per index.
        let draw = (seed ^ i).wrapping_mul(6364136223846793007);
        let bucket = draw % 100;
        let size = if bucket < 90 {
            1 + (draw >> 8) % 32
        } else if bucket < 99 {
            33 + (draw >> 8) % 480
        } else {
            1100 + (draw >> 8) % 2000
        };
        sizes.push(size as usize);
    }
    sizes
}
