//! Error types for the allocation walkthrough
//!
//! [`MemoryError`] covers everything that can go wrong while a routine owns a
//! block. Allocation failures are fatal: the driver halts on the first error and
//! the binary exits with a non-zero status. The deliberate leaks are not errors
//! and never surface here.

use std::fmt;

/// Errors raised by the block model and the heap ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The global allocator returned null
    AllocationFailed { bytes: usize },

    /// The ledger's byte limit would be exceeded
    OutOfMemory {
        requested: usize,
        in_use: usize,
        limit: usize,
    },

    /// Element index past the end of a block
    BufferOverrun { index: usize, len: usize },

    /// Element count too large to describe as a layout
    LayoutOverflow { count: usize },
}

impl MemoryError {
    /// Whether the error came from the allocator itself (as opposed to misuse of a block)
    pub fn is_allocation_failure(&self) -> bool {
        matches!(
            self,
            MemoryError::AllocationFailed { .. }
                | MemoryError::OutOfMemory { .. }
                | MemoryError::LayoutOverflow { .. }
        )
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::AllocationFailed { bytes } => {
                write!(f, "Allocation failed: the allocator refused {} bytes", bytes)
            }
            MemoryError::OutOfMemory {
                requested,
                in_use,
                limit,
            } => {
                write!(
                    f,
                    "Out of memory: requested {} bytes, {} already in use, limit is {}",
                    requested, in_use, limit
                )
            }
            MemoryError::BufferOverrun { index, len } => {
                write!(
                    f,
                    "Buffer overrun: index {} out of bounds for block of {} elements",
                    index, len
                )
            }
            MemoryError::LayoutOverflow { count } => {
                write!(f, "Cannot lay out {} elements: size overflows", count)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

/// Errors from command-line parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Argument the binary does not understand
    UnknownArgument(String),

    /// Option given without its value
    MissingValue(String),

    /// Option value that does not parse
    InvalidValue { option: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownArgument(arg) => write!(f, "Unknown argument '{}'", arg),
            ConfigError::MissingValue(option) => write!(f, "Option '{}' needs a value", option),
            ConfigError::InvalidValue { option, value } => {
                write!(f, "Invalid value '{}' for option '{}'", value, option)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
