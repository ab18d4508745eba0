//! System-allocator shim for block memory.
//!
//! The only module that calls into `std::alloc`. Blocks are reserved
//! zero-initialised and aligned to the platform pointer size, so a
//! pointer-aligned offset within a block yields a pointer-aligned
//! address. Allocation failure is reported as `None` and surfaced by the
//! caller as [`ArenaError::OutOfMemory`](crate::ArenaError::OutOfMemory);
//! this layer never retries and never aborts.

#![allow(unsafe_code)]

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::mem;
use std::ptr::NonNull;

/// Alignment of every block base address: the platform pointer size.
pub(crate) const BLOCK_ALIGN: usize = mem::align_of::<usize>();

/// Reserve `capacity` zero-initialised bytes aligned to [`BLOCK_ALIGN`].
///
/// Returns `None` if the layout is unrepresentable or the system
/// allocator refuses the request. `capacity` must be non-zero.
pub(crate) fn reserve(capacity: usize) -> Option<NonNull<u8>> {
    debug_assert!(capacity >= 1);
    let layout = Layout::from_size_align(capacity, BLOCK_ALIGN).ok()?;
    // SAFETY: `capacity` is non-zero, so the layout has non-zero size as
    // `alloc_zeroed` requires.
    let ptr = unsafe { alloc_zeroed(layout) };
    NonNull::new(ptr)
}

/// Release a buffer previously obtained from [`reserve`].
///
/// # Safety
///
/// `ptr` must have come from `reserve(capacity)` with this exact
/// `capacity`, must not have been released before, and must not be used
/// afterwards.
pub(crate) unsafe fn release(ptr: NonNull<u8>, capacity: usize) {
    let layout = Layout::from_size_align(capacity, BLOCK_ALIGN)
        .expect("layout was representable at reserve time");
    // SAFETY: the caller guarantees `ptr` came from `reserve(capacity)`,
    // which used this exact layout.
    unsafe { dealloc(ptr.as_ptr(), layout) };
}
