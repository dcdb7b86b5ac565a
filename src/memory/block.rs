//! Owning handles over raw allocations
//!
//! A [`RawBlock`] is storage for `len` [`Element`]s obtained directly from the
//! global allocator. It is the only way the routines touch the heap:
//! - `allocate` maps to malloc/calloc depending on the [`FillRule`]
//! - `grow` maps to realloc and consumes the old handle
//! - `release` maps to free and consumes the handle
//! - `abandon` hands back the raw pointer and frees nothing
//!
//! There is deliberately no `Drop` impl. A handle that goes out of scope without
//! `release` leaks its storage, exactly as a forgotten `free` would.
//!
//! # Initialization Tracking
//!
//! Slots written by a fill rule or by [`RawBlock::set`] are marked initialized.
//! Reading any other slot yields `None` instead of touching indeterminate memory.

use super::view::ByteView;
use super::{BlockId, Element, FillRule, ELEMENT_WIDTH};
use crate::errors::MemoryError;
use std::alloc::{self, Layout};
use std::mem::MaybeUninit;
use std::ptr::NonNull;

fn layout_for(count: usize) -> Result<Layout, MemoryError> {
    Layout::array::<Element>(count).map_err(|_| MemoryError::LayoutOverflow { count })
}

fn raw_alloc(layout: Layout, zeroed: bool) -> Result<NonNull<Element>, MemoryError> {
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }
    // SAFETY: layout has a non-zero size
    let raw = unsafe {
        if zeroed {
            alloc::alloc_zeroed(layout)
        } else {
            alloc::alloc(layout)
        }
    };
    NonNull::new(raw.cast::<Element>()).ok_or(MemoryError::AllocationFailed {
        bytes: layout.size(),
    })
}

/// A block of heap storage holding `len` elements
#[derive(Debug)]
pub struct RawBlock {
    id: BlockId,
    ptr: NonNull<Element>,
    layout: Layout,
    len: usize,
    init: Vec<bool>, // Per-element initialization tracking
    rule: FillRule,
}

impl RawBlock {
    /// Allocate storage for `count` elements and populate it with `rule`
    pub(crate) fn allocate(id: BlockId, count: usize, rule: FillRule) -> Result<Self, MemoryError> {
        let layout = layout_for(count)?;
        let ptr = raw_alloc(layout, rule == FillRule::Zeroed)?;
        let mut block = RawBlock {
            id,
            ptr,
            layout,
            len: count,
            init: vec![false; count],
            rule,
        };
        block.fill_from(0);
        Ok(block)
    }

    fn fill_from(&mut self, start: usize) {
        for index in start..self.len {
            if let Some(value) = self.rule.value_at(index) {
                // SAFETY: index < len and the storage holds len aligned elements
                unsafe { self.ptr.as_ptr().add(index).write(value) };
                self.init[index] = true;
            }
        }
    }

    fn free_storage(&self) {
        if self.layout.size() != 0 {
            // SAFETY: ptr was returned by the global allocator for exactly this layout
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout) };
        }
    }

    /// Resize to `new_count` elements.
    ///
    /// Values at `0..min(old, new)` survive; new slots get the block's fill rule.
    /// The old handle is consumed, so the pre-growth storage cannot be touched again.
    /// On failure the storage is freed.
    pub(crate) fn grow(mut self, new_count: usize) -> Result<Self, MemoryError> {
        let new_layout = match layout_for(new_count) {
            Ok(layout) => layout,
            Err(e) => {
                self.free_storage();
                return Err(e);
            }
        };

        let ptr = match (self.layout.size(), new_layout.size()) {
            (0, _) => raw_alloc(new_layout, self.rule == FillRule::Zeroed)?,
            (_, 0) => {
                self.free_storage();
                NonNull::dangling()
            }
            (_, new_size) => {
                // SAFETY: ptr came from the global allocator with self.layout, new_size is
                // non-zero and Layout::array already checked it against isize::MAX
                let raw = unsafe {
                    alloc::realloc(self.ptr.as_ptr().cast::<u8>(), self.layout, new_size)
                };
                match NonNull::new(raw.cast::<Element>()) {
                    Some(ptr) => ptr,
                    None => {
                        // realloc leaves the original untouched on failure
                        self.free_storage();
                        return Err(MemoryError::AllocationFailed { bytes: new_size });
                    }
                }
            }
        };

        let old_len = self.len;
        self.ptr = ptr;
        self.layout = new_layout;
        self.len = new_count;
        self.init.resize(new_count, false);
        self.fill_from(old_len);
        Ok(self)
    }

    /// Free the storage. The handle is consumed.
    pub(crate) fn release(self) {
        self.free_storage();
    }

    /// Give up ownership without freeing, returning the raw pointer
    pub(crate) fn abandon(self) -> *const Element {
        self.ptr.as_ptr()
    }

    /// Ledger identifier
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the storage in bytes
    pub fn size_bytes(&self) -> usize {
        self.len * ELEMENT_WIDTH
    }

    /// Base address of the storage (for narration only)
    pub fn address(&self) -> *const Element {
        self.ptr.as_ptr()
    }

    /// Whether slot `index` has been written
    pub fn is_initialized(&self, index: usize) -> bool {
        self.init.get(index).copied().unwrap_or(false)
    }

    /// Read slot `index`; `None` if out of range or never written
    pub fn get(&self, index: usize) -> Option<Element> {
        if !self.is_initialized(index) {
            return None;
        }
        // SAFETY: index < len and the slot is initialized
        Some(unsafe { self.ptr.as_ptr().add(index).read() })
    }

    /// Write slot `index`
    pub fn set(&mut self, index: usize, value: Element) -> Result<(), MemoryError> {
        if index >= self.len {
            return Err(MemoryError::BufferOverrun {
                index,
                len: self.len,
            });
        }
        // SAFETY: index < len and the storage holds len aligned elements
        unsafe { self.ptr.as_ptr().add(index).write(value) };
        self.init[index] = true;
        Ok(())
    }

    /// Every slot in order, `None` for indeterminate ones
    pub fn values(&self) -> Vec<Option<Element>> {
        (0..self.len).map(|i| self.get(i)).collect()
    }

    /// Reinterpret the storage as bytes without copying
    pub fn as_bytes(&self) -> ByteView<'_> {
        // SAFETY: the storage spans size_bytes() bytes and outlives &self. MaybeUninit<u8>
        // may cover uninitialized bytes; ByteView only reads bytes whose element is initialized.
        let bytes = unsafe {
            std::slice::from_raw_parts(
                self.ptr.as_ptr().cast::<MaybeUninit<u8>>(),
                self.size_bytes(),
            )
        };
        ByteView::new(bytes, &self.init)
    }
}
