//! The two leak patterns
//!
//! Neither routine is an error: both complete normally and leave their block
//! unreclaimed. The ledger reports them afterwards.

use crate::errors::MemoryError;
use crate::memory::heap::Heap;
use crate::memory::{Element, FillRule};
use crate::narration::Narrator;

const DANGLING_OWNER: &str = "memory_leak_example";
const SCOPE_OWNER: &str = "memory_leak_function_example";

/// Lose the only reference to a block by pointing it at a stack value
pub fn memory_leak_example(heap: &mut Heap, out: &mut Narrator) -> Result<(), MemoryError> {
    let x: Element = 5;
    out.address("x address", &x as *const Element);
    out.observed(format!("x value: {}", x));

    let mut block = heap.allocate(1, FillRule::Indeterminate, DANGLING_OWNER)?;
    block.set(0, 4)?;

    let mut p: *const Element = heap.abandon(block);
    out.address("p address", p);
    // SAFETY: abandoned storage is never freed and slot 0 was written above
    out.observed(format!("p value: {}", unsafe { *p }));

    p = &x;
    out.address("p address", p);
    // SAFETY: p points at x, which is alive for the rest of this function
    out.observed(format!("p value: {}", unsafe { *p }));

    out.explain("The allocated block is now unreachable: its only reference was overwritten.");
    out.explain(
        "Even if we free p now, our program would still leak memory as the reference to our allocated memory was lost",
    );
    out.explain("You can check this by running the program through valgrind");
    Ok(())
}

/// Allocate, compute, and return while the block is still allocated
fn square_without_release(heap: &mut Heap) -> Result<Element, MemoryError> {
    let mut p = heap.allocate(1, FillRule::Indeterminate, SCOPE_OWNER)?;
    p.set(0, 4)?;
    heap.observe(&p);

    let value = p.get(0).unwrap_or_default();
    Ok(value * value)
}

pub fn memory_leak_function_example(
    heap: &mut Heap,
    out: &mut Narrator,
) -> Result<(), MemoryError> {
    let square = square_without_release(heap)?;
    out.observed(format!("square of 4 is: {}", square));
    out.explain("Function doesn't free the allocated memory before returning");
    Ok(())
}
