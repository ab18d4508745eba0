//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A request for zero bytes. Callers must request at least one byte;
    /// this is a contract violation, not a runtime condition.
    ZeroSizedRequest,
    /// The system allocator could not reserve a new block. The arena has
    /// no eviction or spill path, so this is fatal for the operation.
    OutOfMemory {
        /// Number of bytes requested from the system allocator.
        requested: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSizedRequest => {
                write!(f, "allocation request must be at least one byte")
            }
            Self::OutOfMemory { requested } => {
                write!(f, "system allocator failed to reserve {requested} bytes")
            }
        }
    }
}

impl Error for ArenaError {}
