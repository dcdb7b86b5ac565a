//! Byte-level views over blocks
//!
//! A [`ByteView`] borrows a block's storage and exposes it one byte at a time.
//! It owns nothing and cannot outlive the block it was taken from. Bytes that
//! belong to an element that was never written read back as `None`.

use super::{Element, Endianness, ELEMENT_WIDTH};
use std::mem::MaybeUninit;

/// Read-only byte reinterpretation of a block
#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    bytes: &'a [MaybeUninit<u8>],
    init: &'a [bool], // Per-element, one entry per ELEMENT_WIDTH bytes
}

impl<'a> ByteView<'a> {
    pub(crate) fn new(bytes: &'a [MaybeUninit<u8>], init: &'a [bool]) -> Self {
        debug_assert_eq!(bytes.len(), init.len() * ELEMENT_WIDTH);
        ByteView { bytes, init }
    }

    /// Number of bytes in the view
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The `index`-th byte of the in-memory representation
    pub fn get(&self, index: usize) -> Option<u8> {
        let element_written = self.init.get(index / ELEMENT_WIDTH).copied()?;
        if !element_written {
            return None;
        }
        // SAFETY: the owning element was written, so all of its bytes are initialized
        self.bytes.get(index).map(|b| unsafe { b.assume_init() })
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Copy the view out, `None` marking indeterminate bytes
    pub fn to_vec(&self) -> Vec<Option<u8>> {
        self.iter().collect()
    }

    /// Reassemble element `index` from its bytes in native order
    pub fn element(&self, index: usize) -> Option<Element> {
        let start = index.checked_mul(ELEMENT_WIDTH)?;
        let mut raw = [0u8; ELEMENT_WIDTH];
        for (offset, slot) in raw.iter_mut().enumerate() {
            *slot = self.get(start + offset)?;
        }
        Some(Element::from_ne_bytes(raw))
    }

    /// Byte order the view was observed under
    pub fn endianness(&self) -> Endianness {
        Endianness::native()
    }
}

/// Render bytes as space-separated hex, `??` for indeterminate ones
pub fn format_hex(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(b) => format!("{:02x}", b),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render bytes as characters, `?` for indeterminate or non-printable ones
pub fn format_chars(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(b) if b.is_ascii_graphic() => (*b as char).to_string(),
            _ => "?".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::block::RawBlock;
    use crate::memory::FillRule;

    #[test]
    fn test_word_reinterpreted_as_characters() {
        let mut block = RawBlock::allocate(1, 1, FillRule::Indeterminate).unwrap();
        block.set(0, 1684234849).unwrap();

        let view = block.as_bytes();
        let expected: Vec<Option<u8>> = 1684234849i32.to_ne_bytes().into_iter().map(Some).collect();
        assert_eq!(view.to_vec(), expected);

        let chars = format_chars(&view.to_vec());
        match view.endianness() {
            Endianness::Little => assert_eq!(chars, "a b c d"),
            Endianness::Big => assert_eq!(chars, "d c b a"),
        }
        block.release();
    }

    #[test]
    fn test_element_round_trips_through_bytes() {
        let block = RawBlock::allocate(1, 3, FillRule::IndexPlusOne).unwrap();
        let view = block.as_bytes();
        assert_eq!(view.element(2), Some(3));
        assert_eq!(view.element(3), None);
        block.release();
    }

    #[test]
    fn test_unwritten_bytes_are_unknown() {
        let mut block = RawBlock::allocate(1, 2, FillRule::Indeterminate).unwrap();
        block.set(1, -1).unwrap();
        let view = block.as_bytes();
        assert_eq!(view.get(0), None);
        assert_eq!(view.get(4), Some(0xff));
        assert_eq!(
            format_hex(&view.to_vec()),
            "?? ?? ?? ?? ff ff ff ff"
        );
        block.release();
    }
}
