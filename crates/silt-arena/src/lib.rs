//! Concurrent bump-pointer arena allocation for silt's in-memory write path.
//!
//! An [`Arena`] hands out many small, variable-sized byte regions from a
//! growing set of fixed-capacity blocks. Individual regions are never
//! reclaimed; every block is released at once when the arena is dropped.
//! This is the allocation substrate behind transient in-memory structures
//! such as the node records of a skip-list write buffer, where per-object
//! deallocation bookkeeping would be pure overhead.
//!
//! # Architecture
//!
//! ```text
//! Arena (coordinator)
//! ├── AtomicPtr<Block>            current shared block (lock-free bump cursor)
//! ├── Mutex<SmallVec<[_; 4]>>     owned-block registry (cold path only)
//! └── AtomicUsize                 reserved-bytes accountant
//! ```
//!
//! The hot path is a single `fetch_add` on the current block's cursor.
//! When a block is exhausted, a replacement is installed with a
//! compare-exchange; the loser of that race keeps its freshly reserved
//! block for its own request instead of blocking or retrying. Requests
//! larger than [`ArenaConfig::large_alloc_threshold`] bypass the shared
//! cursor entirely and get a block sized exactly for the request.
//!
//! # Safety
//!
//! This crate contains bounded `unsafe` code, confined to the raw
//! system-allocator shim, the block bump cursor, and the arena's pointer
//! plumbing. Every `unsafe` block carries a `// SAFETY:` comment. Returned
//! regions are zero-initialised and borrow the arena, so the compiler
//! rules out use-after-teardown.
//!
//! # Example
//!
//! ```
//! use silt_arena::Arena;
//!
//! let arena = Arena::new();
//! let node = arena.alloc(24)?;
//! node[0] = 0xFF;
//! let key = arena.alloc_copy(b"user:1001")?;
//! assert_eq!(&key[..5], b"user:");
//! assert!(arena.memory_usage() >= 4096);
//! # Ok::<(), silt_arena::ArenaError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
mod block;
pub mod config;
pub mod error;
mod raw;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::ArenaError;
