// Growing an allocated block

use crate::errors::MemoryError;
use crate::memory::heap::Heap;
use crate::memory::FillRule;
use crate::narration::{format_slots, Narrator};

const OWNER: &str = "increase_size_of_allocated_memory";

pub fn increase_size_of_allocated_memory(
    heap: &mut Heap,
    out: &mut Narrator,
) -> Result<(), MemoryError> {
    let mut size = 4;
    let pa = heap.allocate(size, FillRule::IndexPlusOne, OWNER)?;
    out.observed(format_slots(&pa.values()));

    size *= 2;
    let pa = heap.grow(pa, size)?;
    out.observed(format_slots(&pa.values()));

    heap.release(pa);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_sequence() {
        let mut heap = Heap::default();
        let mut out = Narrator::new();
        increase_size_of_allocated_memory(&mut heap, &mut out).unwrap();

        assert_eq!(
            out.deterministic_output(),
            vec!["[ 1 2 3 4 ]", "[ 1 2 3 4 5 6 7 8 ]"]
        );
        let record = &heap.records()[0];
        assert_eq!(record.elements, 8);
        assert_eq!(record.reallocations, 1);
        assert_eq!(heap.bytes_in_use(), 0);
    }
}
