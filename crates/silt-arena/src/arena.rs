//! The arena allocator: shared bump cursor, block rollover, accounting.
//!
//! [`Arena`] coordinates three pieces of shared state: the current shared
//! block (published through an `AtomicPtr`), the owned-block registry
//! (a mutex-guarded list touched only when a block is created), and the
//! reserved-bytes accountant (an `AtomicUsize`). The allocation fast path
//! is a single `fetch_add` on the current block's cursor; no lock is
//! taken unless a new block is needed.
//!
//! # Rollover
//!
//! When the current block cannot fit a request, the requesting thread
//! reserves a fresh shared-size block, claims its own range from it, and
//! tries to publish it with one `compare_exchange`. If another thread
//! published first, the fresh block simply stays dedicated to the one
//! range already claimed from it. Races therefore cost a little extra
//! block churn, never a stall, and every granted range stays disjoint.

#![allow(unsafe_code)]

use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use std::sync::Mutex;

use smallvec::SmallVec;

use crate::block::Block;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::raw;

/// A bump-pointer arena: grants memory in bulk, reclaims it in bulk.
///
/// All allocation methods take `&self` and may be called concurrently
/// from any number of threads. Returned slices borrow the arena, so the
/// compiler guarantees they are unreachable once the arena is dropped,
/// and that the arena cannot be dropped while an allocation call is in
/// flight.
pub struct Arena {
    config: ArenaConfig,
    /// The shared block new small requests bump from. Null until the
    /// first small allocation.
    current: AtomicPtr<Block>,
    /// Every block this arena has ever reserved, in creation order.
    /// Blocks are appended on the cold path and freed only in `Drop`.
    blocks: Mutex<SmallVec<[ptr::NonNull<Block>; 4]>>,
    /// Total bytes reserved from the system allocator, by block capacity.
    usage: AtomicUsize,
}

// SAFETY: registry pointers are uniquely owned by the Arena (created via
// Box::leak, freed exactly once in Drop), and all shared mutation goes
// through atomics or the registry mutex.
unsafe impl Send for Arena {}
// SAFETY: as above.
unsafe impl Sync for Arena {}

impl Arena {
    /// Create an arena with the default configuration (4KiB shared
    /// blocks, 1KiB dedicated-block cutover). Reserves nothing until the
    /// first allocation.
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    /// Create an arena with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config` is out of range (see [`ArenaConfig`]).
    pub fn with_config(config: ArenaConfig) -> Self {
        config.validate();
        Self {
            config,
            current: AtomicPtr::new(ptr::null_mut()),
            blocks: Mutex::new(SmallVec::new()),
            usage: AtomicUsize::new(0),
        }
    }

    /// Allocate `len` writable, zero-initialised bytes.
    ///
    /// The returned slice stays valid until the arena is dropped and is
    /// disjoint from every other allocation, including ones granted
    /// concurrently on other threads.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ZeroSizedRequest`] if `len == 0`;
    /// [`ArenaError::OutOfMemory`] if the system allocator cannot supply
    /// a needed block.
    pub fn alloc(&self, len: usize) -> Result<&mut [u8], ArenaError> {
        if len == 0 {
            return Err(ArenaError::ZeroSizedRequest);
        }
        if len > self.config.large_alloc_threshold {
            return self.alloc_dedicated(len, 1);
        }
        self.alloc_bumped(len, 1)
    }

    /// Allocate `len` bytes whose starting address is a multiple of the
    /// platform pointer size.
    ///
    /// Semantics are otherwise identical to [`Arena::alloc`]. Alignment
    /// padding is charged against the current block, and the padded size
    /// decides whether the request gets a dedicated block.
    ///
    /// # Errors
    ///
    /// As for [`Arena::alloc`].
    pub fn alloc_aligned(&self, len: usize) -> Result<&mut [u8], ArenaError> {
        if len == 0 {
            return Err(ArenaError::ZeroSizedRequest);
        }
        let align = raw::BLOCK_ALIGN;
        let padded = len.checked_add(align - 1).unwrap_or(usize::MAX);
        if padded > self.config.large_alloc_threshold {
            // Fresh block bases are already pointer-aligned.
            return self.alloc_dedicated(len, align);
        }
        self.alloc_bumped(len, align)
    }

    /// Allocate a copy of `src` inside the arena.
    ///
    /// Write-buffer convenience for interning key/value bytes.
    ///
    /// # Errors
    ///
    /// As for [`Arena::alloc`]; an empty `src` is a zero-sized request.
    pub fn alloc_copy(&self, src: &[u8]) -> Result<&mut [u8], ArenaError> {
        let dst = self.alloc(src.len())?;
        dst.copy_from_slice(src);
        Ok(dst)
    }

    /// Total bytes reserved from the system allocator across all blocks
    /// (capacities, not bytes handed out). Monotonically non-decreasing;
    /// safe to read concurrently with any number of allocations.
    pub fn memory_usage(&self) -> usize {
        self.usage.load(Ordering::Relaxed)
    }

    /// Number of blocks this arena currently owns.
    pub fn block_count(&self) -> usize {
        self.registry().len()
    }

    /// Shared-cursor path for requests at or under the threshold.
    fn alloc_bumped(&self, len: usize, align: usize) -> Result<&mut [u8], ArenaError> {
        let seen = self.current.load(Ordering::Acquire);
        if !seen.is_null() {
            // SAFETY: published block pointers come from the registry,
            // which frees them only in Drop; Drop requires exclusive
            // ownership, so `seen` is valid for the life of `&self`.
            let block: &Block = unsafe { &*seen };
            if let Some(range) = block.try_bump(len, align) {
                return Ok(range);
            }
        }
        self.roll_over(seen, len, align)
    }

    /// Install a fresh shared block, serving the triggering request from
    /// it first. The request fits unconditionally: its padded size is at
    /// most the threshold, which is at most the shared block size.
    fn roll_over(
        &self,
        seen: *mut Block,
        len: usize,
        align: usize,
    ) -> Result<&mut [u8], ArenaError> {
        let fresh = self.reserve_block(self.config.block_size)?;
        // SAFETY: `reserve_block` just registered this pointer; registry
        // entries stay valid until Drop.
        let block: &Block = unsafe { fresh.as_ref() };
        let range = block
            .try_bump(len, align)
            .expect("fresh shared block fits any below-threshold request");
        // Publish. If another thread replaced `seen` first, this block
        // stays dedicated to the range claimed above; nobody blocks or
        // retries against the shared cursor.
        let _ = self.current.compare_exchange(
            seen,
            fresh.as_ptr(),
            Ordering::AcqRel,
            Ordering::Relaxed,
        );
        Ok(range)
    }

    /// Dedicated-block path for requests over the threshold: one block of
    /// exactly `len` bytes, never shared, never published.
    fn alloc_dedicated(&self, len: usize, align: usize) -> Result<&mut [u8], ArenaError> {
        let dedicated = self.reserve_block(len)?;
        // SAFETY: `reserve_block` just registered this pointer; registry
        // entries stay valid until Drop.
        let block: &Block = unsafe { dedicated.as_ref() };
        let range = block
            .try_bump(len, align)
            .expect("dedicated block is sized for its one request");
        Ok(range)
    }

    /// Reserve a block of exactly `capacity` bytes, take ownership of it
    /// in the registry, and charge the accountant.
    fn reserve_block(&self, capacity: usize) -> Result<ptr::NonNull<Block>, ArenaError> {
        let block = Block::new(capacity).ok_or(ArenaError::OutOfMemory {
            requested: capacity,
        })?;
        let block = ptr::NonNull::from(Box::leak(Box::new(block)));
        self.registry().push(block);
        self.usage.fetch_add(capacity, Ordering::Relaxed);
        Ok(block)
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, SmallVec<[ptr::NonNull<Block>; 4]>> {
        // A panic cannot leave the registry half-updated: the only
        // mutation under the lock is a push.
        self.blocks.lock().expect("block registry poisoned")
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let mut blocks = self.registry();
        for block in blocks.drain(..) {
            // SAFETY: every registry pointer came from Box::leak in
            // `reserve_block` and is reboxed exactly once, here.
            drop(unsafe { Box::from_raw(block.as_ptr()) });
        }
    }
}
