//! Memory model for the walkthrough
//!
//! This module provides the allocation primitives the routines are built from:
//! - [`block`]: [`block::RawBlock`], an owning handle over storage taken straight
//!   from the global allocator, released only when asked to
//! - [`view`]: [`view::ByteView`], a borrowed byte-level reinterpretation of a block
//! - [`heap`]: [`heap::Heap`], the ledger that hands out blocks and remembers what
//!   became of each one
//!
//! # Element Layout
//!
//! Every block holds [`Element`]s (`i32`, [`ELEMENT_WIDTH`] bytes each), laid out
//! contiguously:
//! ```text
//! address(i) = base + i * ELEMENT_WIDTH
//! ```
//!
//! Byte order inside an element is whatever the platform uses; see [`Endianness`].

pub mod block;
pub mod heap;
pub mod view;

use std::fmt;

/// The integer type stored in every block
pub type Element = i32;

/// Width of one element in bytes
pub const ELEMENT_WIDTH: usize = std::mem::size_of::<Element>();

/// Identifier the ledger assigns to each block
pub type BlockId = u32;

/// How fresh slots of a block are populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    /// malloc: contents are indeterminate until written
    Indeterminate,
    /// calloc: every byte is zero
    Zeroed,
    /// Slot `i` holds `i + 1`
    IndexPlusOne,
}

impl FillRule {
    /// Value a fresh slot at `index` receives, `None` when it stays indeterminate
    pub fn value_at(self, index: usize) -> Option<Element> {
        match self {
            FillRule::Indeterminate => None,
            FillRule::Zeroed => Some(0),
            FillRule::IndexPlusOne => Some(index as Element + 1),
        }
    }
}

/// Byte order observed on the running platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// The byte order of the target this binary was built for
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little-endian"),
            Endianness::Big => write!(f, "big-endian"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rules() {
        assert_eq!(FillRule::Indeterminate.value_at(3), None);
        assert_eq!(FillRule::Zeroed.value_at(3), Some(0));
        assert_eq!(FillRule::IndexPlusOne.value_at(0), Some(1));
        assert_eq!(FillRule::IndexPlusOne.value_at(7), Some(8));
    }

    #[test]
    fn test_native_endianness_matches_observed_layout() {
        let bytes = 1i32.to_ne_bytes();
        match Endianness::native() {
            Endianness::Little => assert_eq!(bytes, [1, 0, 0, 0]),
            Endianness::Big => assert_eq!(bytes, [0, 0, 0, 1]),
        }
        assert_eq!(ELEMENT_WIDTH, 4);
    }
}
