// Memory as a sequence of bytes

use crate::errors::MemoryError;
use crate::memory::heap::Heap;
use crate::memory::view::format_hex;
use crate::memory::FillRule;
use crate::narration::{format_slot, Narrator};

const OWNER: &str = "represent_memory_as_sequence_of_bytes";

pub fn represent_memory_as_sequence_of_bytes(
    heap: &mut Heap,
    out: &mut Narrator,
) -> Result<(), MemoryError> {
    let mut p = heap.allocate(1, FillRule::Indeterminate, OWNER)?;
    p.set(0, 26)?;
    heap.observe(&p);

    let deref = p.get(0);
    out.address("The address is", p.address());
    out.observed(format!("The value is: {}", format_slot(deref)));
    out.explain("Memory is just a sequence of bytes, like an array.");

    let view = p.as_bytes();
    out.observed(format!("Its {} bytes are: {}", view.len(), format_hex(&view.to_vec())));
    out.explain("It's also possible to use index notation to get the value of a pointer");
    out.observed(format!(
        "p[0] == *p: {}",
        if view.element(0) == deref { "true" } else { "false" }
    ));

    heap.release(p);
    Ok(())
}
