//! Allocation ledger
//!
//! The [`Heap`] hands out [`RawBlock`]s and keeps one [`BlockRecord`] per block:
//! - Explicit allocation, growth and release go through it
//! - Released blocks stay in the ledger as tombstones
//! - Abandoned blocks are recorded without their address, so the ledger cannot
//!   be used to reach them again
//! - Blocks dropped without release stay `Live` and show up in the leak summary
//!
//! Records hold an image of the block's bytes as last observed, which is what
//! the viewer's heap pane draws.

use super::block::RawBlock;
use super::{BlockId, Element, FillRule, ELEMENT_WIDTH};
use crate::constants::DEFAULT_HEAP_LIMIT;
use crate::errors::MemoryError;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

/// What became of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Live,
    Released,
    Abandoned, // Only reference lost, never freed
}

impl BlockState {
    pub fn label(self) -> &'static str {
        match self {
            BlockState::Live => "live",
            BlockState::Released => "freed",
            BlockState::Abandoned => "unreachable",
        }
    }
}

/// Ledger entry for one block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    pub id: BlockId,
    pub owner: &'static str, // Routine that allocated it
    pub elements: usize,
    pub fill: FillRule,
    pub state: BlockState,
    pub reallocations: u32,
    pub image: Vec<Option<u8>>, // Bytes as last observed
}

impl BlockRecord {
    pub fn size_bytes(&self) -> usize {
        self.elements * ELEMENT_WIDTH
    }

    /// Still holding memory nobody will free
    pub fn is_leaked(&self) -> bool {
        matches!(self.state, BlockState::Live | BlockState::Abandoned)
    }
}

/// Blocks and bytes never released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeakSummary {
    pub blocks: usize,
    pub bytes: usize,
}

/// The ledger
#[derive(Debug, Clone)]
pub struct Heap {
    records: FxHashMap<BlockId, BlockRecord>,
    next_id: BlockId,
    bytes_in_use: usize,
    max_bytes: usize,
}

impl Heap {
    /// Create a ledger that refuses to hold more than `max_bytes` at once
    pub fn new(max_bytes: usize) -> Self {
        Heap {
            records: FxHashMap::default(),
            next_id: 1,
            bytes_in_use: 0,
            max_bytes,
        }
    }

    fn reserve(&self, requested: usize) -> Result<(), MemoryError> {
        match self.bytes_in_use.checked_add(requested) {
            Some(total) if total <= self.max_bytes => Ok(()),
            _ => Err(MemoryError::OutOfMemory {
                requested,
                in_use: self.bytes_in_use,
                limit: self.max_bytes,
            }),
        }
    }

    /// Allocate `count` elements on behalf of `owner`
    pub fn allocate(
        &mut self,
        count: usize,
        fill: FillRule,
        owner: &'static str,
    ) -> Result<RawBlock, MemoryError> {
        let requested = count
            .checked_mul(ELEMENT_WIDTH)
            .ok_or(MemoryError::LayoutOverflow { count })?;
        self.reserve(requested)?;

        let id = self.next_id;
        let block = RawBlock::allocate(id, count, fill)?;
        self.next_id += 1;
        self.bytes_in_use += requested;

        debug!(block = id, owner, elements = count, ?fill, "allocated");
        self.records.insert(
            id,
            BlockRecord {
                id,
                owner,
                elements: count,
                fill,
                state: BlockState::Live,
                reallocations: 0,
                image: block.as_bytes().to_vec(),
            },
        );
        Ok(block)
    }

    /// Resize `block` to `new_count` elements; the old handle is consumed.
    ///
    /// On failure the block is freed and its record becomes a tombstone.
    pub fn grow(&mut self, block: RawBlock, new_count: usize) -> Result<RawBlock, MemoryError> {
        let old_bytes = block.size_bytes();
        let new_bytes = match new_count.checked_mul(ELEMENT_WIDTH) {
            Some(bytes) => bytes,
            None => {
                self.release(block);
                return Err(MemoryError::LayoutOverflow { count: new_count });
            }
        };
        if new_bytes > old_bytes {
            if let Err(e) = self.reserve(new_bytes - old_bytes) {
                self.release(block);
                return Err(e);
            }
        }

        let id = block.id();
        let block = match block.grow(new_count) {
            Ok(block) => block,
            Err(e) => {
                // RawBlock::grow frees the storage before failing
                self.bytes_in_use -= old_bytes;
                if let Some(record) = self.records.get_mut(&id) {
                    record.state = BlockState::Released;
                }
                warn!(block = id, error = %e, "reallocation failed");
                return Err(e);
            }
        };
        self.bytes_in_use = self.bytes_in_use - old_bytes + new_bytes;

        debug!(block = id, from = old_bytes, to = new_bytes, "reallocated");
        if let Some(record) = self.records.get_mut(&id) {
            record.elements = new_count;
            record.reallocations += 1;
        }
        self.observe(&block);
        Ok(block)
    }

    /// Free `block`; its record becomes a tombstone
    pub fn release(&mut self, block: RawBlock) {
        let id = block.id();
        self.observe(&block);
        self.bytes_in_use -= block.size_bytes();
        block.release();

        debug!(block = id, "released");
        if let Some(record) = self.records.get_mut(&id) {
            record.state = BlockState::Released;
        }
    }

    /// Give up the only handle to `block` without freeing it.
    ///
    /// The returned pointer stays valid for the rest of the process; once the
    /// caller overwrites it the storage is unreachable.
    pub fn abandon(&mut self, block: RawBlock) -> *const Element {
        let id = block.id();
        self.observe(&block);

        info!(block = id, bytes = block.size_bytes(), "abandoned without release");
        if let Some(record) = self.records.get_mut(&id) {
            record.state = BlockState::Abandoned;
        }
        block.abandon()
    }

    /// Refresh the byte image kept for `block`
    pub fn observe(&mut self, block: &RawBlock) {
        if let Some(record) = self.records.get_mut(&block.id()) {
            record.image = block.as_bytes().to_vec();
        }
    }

    /// Ledger entry for a block
    pub fn record(&self, id: BlockId) -> Option<&BlockRecord> {
        self.records.get(&id)
    }

    /// All records, oldest first
    pub fn records(&self) -> Vec<&BlockRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Bytes currently held by blocks that were not released.
    ///
    /// Abandoned and dropped blocks count here forever.
    pub fn bytes_in_use(&self) -> usize {
        self.bytes_in_use
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Blocks that were never released
    pub fn leak_summary(&self) -> LeakSummary {
        self.records
            .values()
            .filter(|r| r.is_leaked())
            .fold(LeakSummary::default(), |acc, r| LeakSummary {
                blocks: acc.blocks + 1,
                bytes: acc.bytes + r.size_bytes(),
            })
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(DEFAULT_HEAP_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_release() {
        let mut heap = Heap::default();
        let block = heap.allocate(4, FillRule::Zeroed, "test").unwrap();
        let id = block.id();
        assert_eq!(heap.bytes_in_use(), 16);

        heap.release(block);
        assert_eq!(heap.bytes_in_use(), 0);
        let record = heap.record(id).unwrap();
        assert_eq!(record.state, BlockState::Released);
        assert_eq!(record.image, vec![Some(0); 16]);
        assert_eq!(heap.leak_summary(), LeakSummary::default());
    }

    #[test]
    fn test_limit_is_enforced() {
        let mut heap = Heap::new(8);
        let block = heap.allocate(2, FillRule::Zeroed, "test").unwrap();
        let err = heap.allocate(1, FillRule::Zeroed, "test").unwrap_err();
        assert_eq!(
            err,
            MemoryError::OutOfMemory {
                requested: 4,
                in_use: 8,
                limit: 8
            }
        );
        let id = block.id();
        let err = heap.grow(block, 3).unwrap_err();
        assert!(err.is_allocation_failure());

        // A failed grow frees the block and keeps the ledger consistent
        assert_eq!(heap.record(id).unwrap().state, BlockState::Released);
        assert_eq!(heap.bytes_in_use(), 0);
        assert_eq!(heap.leak_summary(), LeakSummary::default());
    }

    #[test]
    fn test_huge_request_is_out_of_memory() {
        let mut heap = Heap::default();
        let small = heap.allocate(1, FillRule::Zeroed, "test").unwrap();
        let err = heap
            .allocate(usize::MAX / 4, FillRule::Indeterminate, "test")
            .unwrap_err();
        assert!(matches!(err, MemoryError::OutOfMemory { in_use: 4, .. }));

        let err = heap.grow(small, usize::MAX / 4).unwrap_err();
        assert!(err.is_allocation_failure());
        assert_eq!(heap.bytes_in_use(), 0);
    }

    #[test]
    fn test_grow_with_unrepresentable_count_frees_block() {
        let mut heap = Heap::new(usize::MAX);
        let block = heap.allocate(2, FillRule::IndexPlusOne, "test").unwrap();
        let id = block.id();
        let err = heap.grow(block, usize::MAX).unwrap_err();
        assert_eq!(err, MemoryError::LayoutOverflow { count: usize::MAX });
        assert_eq!(heap.record(id).unwrap().state, BlockState::Released);
        assert_eq!(heap.bytes_in_use(), 0);
    }

    #[test]
    fn test_grow_updates_record() {
        let mut heap = Heap::default();
        let block = heap.allocate(4, FillRule::IndexPlusOne, "test").unwrap();
        let block = heap.grow(block, 8).unwrap();
        let record = heap.record(block.id()).unwrap();
        assert_eq!(record.elements, 8);
        assert_eq!(record.reallocations, 1);
        assert_eq!(record.image.len(), 32);
        assert_eq!(heap.bytes_in_use(), 32);
        heap.release(block);
    }

    #[test]
    fn test_abandoned_and_dropped_blocks_are_leaks() {
        let mut heap = Heap::default();

        let mut lost = heap.allocate(1, FillRule::Indeterminate, "test").unwrap();
        lost.set(0, 4).unwrap();
        let lost_id = lost.id();
        let _ = heap.abandon(lost);

        {
            let _dropped = heap.allocate(2, FillRule::Zeroed, "test").unwrap();
        }

        let freed = heap.allocate(8, FillRule::Zeroed, "test").unwrap();
        heap.release(freed);

        assert_eq!(heap.record(lost_id).unwrap().state, BlockState::Abandoned);
        assert_eq!(
            heap.leak_summary(),
            LeakSummary {
                blocks: 2,
                bytes: 12
            }
        );
        assert_eq!(heap.bytes_in_use(), 12);
    }

    #[test]
    fn test_records_are_ordered() {
        let mut heap = Heap::default();
        for _ in 0..5 {
            let block = heap.allocate(1, FillRule::Zeroed, "test").unwrap();
            heap.release(block);
        }
        let ids: Vec<_> = heap.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
