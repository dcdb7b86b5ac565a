// Block behaviour through the public heap API

use heapwalk::errors::MemoryError;
use heapwalk::memory::heap::{BlockState, Heap};
use heapwalk::memory::{FillRule, ELEMENT_WIDTH};

#[test]
fn test_byte_view_covers_every_element() {
    let mut heap = Heap::default();
    for n in [1, 2, 5, 64] {
        let block = heap.allocate(n, FillRule::Indeterminate, "test").unwrap();
        assert_eq!(block.as_bytes().len(), n * ELEMENT_WIDTH);
        heap.release(block);
    }
}

#[test]
fn test_growth_keeps_prefix() {
    let mut heap = Heap::default();
    let mut block = heap.allocate(4, FillRule::Zeroed, "test").unwrap();
    for (i, v) in [1, 2, 3, 4].into_iter().enumerate() {
        block.set(i, v).unwrap();
    }

    let block = heap.grow(block, 8).unwrap();
    assert_eq!(
        block.values(),
        vec![Some(1), Some(2), Some(3), Some(4), Some(0), Some(0), Some(0), Some(0)]
    );
    heap.release(block);
}

#[test]
fn test_index_rule_fills_new_slots() {
    let mut heap = Heap::default();
    let block = heap.allocate(3, FillRule::IndexPlusOne, "test").unwrap();
    let block = heap.grow(block, 6).unwrap();
    let values: Vec<i32> = block.values().into_iter().flatten().collect();
    assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    heap.release(block);
}

#[test]
fn test_shrinking_keeps_leading_values() {
    let mut heap = Heap::default();
    let block = heap.allocate(8, FillRule::IndexPlusOne, "test").unwrap();
    let block = heap.grow(block, 3).unwrap();
    assert_eq!(block.len(), 3);
    assert_eq!(block.values(), vec![Some(1), Some(2), Some(3)]);
    heap.release(block);
    assert_eq!(heap.bytes_in_use(), 0);
}

#[test]
fn test_overrun_is_reported() {
    let mut heap = Heap::default();
    let mut block = heap.allocate(2, FillRule::Zeroed, "test").unwrap();
    assert_eq!(
        block.set(5, 1).unwrap_err(),
        MemoryError::BufferOverrun { index: 5, len: 2 }
    );
    let id = block.id();
    heap.release(block);
    assert_eq!(heap.record(id).unwrap().state, BlockState::Released);
}
