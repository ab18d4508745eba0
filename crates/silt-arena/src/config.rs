//! Arena configuration parameters.

/// Configuration for an [`Arena`](crate::Arena).
///
/// Controls shared-block sizing and the dedicated-block cutover.
/// Validated when the arena is constructed; immutable afterwards.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Capacity of each shared block in bytes.
    ///
    /// Default: 4096. Must be at least [`ArenaConfig::MIN_BLOCK_SIZE`].
    /// Sized so that block rollover stays rare for write-buffer node
    /// records (tens of bytes each).
    pub block_size: usize,

    /// Requests strictly larger than this many bytes bypass the shared
    /// bump cursor and receive a block sized exactly for the request,
    /// so an outsized record cannot strand the tail of a shared block.
    ///
    /// Default: `block_size / 4`. Must be between 1 and `block_size`.
    pub large_alloc_threshold: usize,
}

impl ArenaConfig {
    /// Default shared-block capacity: 4KiB.
    pub const DEFAULT_BLOCK_SIZE: usize = 4096;

    /// Smallest permitted shared-block capacity.
    pub const MIN_BLOCK_SIZE: usize = 64;

    /// Create a config with the given shared-block size and the default
    /// quarter-block dedicated cutover.
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size,
            large_alloc_threshold: block_size / 4,
        }
    }

    /// Check the parameters an arena is about to be built from.
    ///
    /// Panics on out-of-range values; a bad config is a construction-time
    /// caller bug, not a runtime condition.
    pub(crate) fn validate(&self) {
        assert!(
            self.block_size >= Self::MIN_BLOCK_SIZE,
            "block_size {} below minimum {}",
            self.block_size,
            Self::MIN_BLOCK_SIZE,
        );
        assert!(
            self.large_alloc_threshold >= 1 && self.large_alloc_threshold <= self.block_size,
            "large_alloc_threshold {} outside 1..={}",
            self.large_alloc_threshold,
            self.block_size,
        );
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::with_block_size(Self::DEFAULT_BLOCK_SIZE)
    }
}
