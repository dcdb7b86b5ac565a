// Data types over dynamic memory: one word seen as four characters

use crate::errors::MemoryError;
use crate::memory::heap::Heap;
use crate::memory::view::format_chars;
use crate::memory::{Element, Endianness, FillRule};
use crate::narration::{format_slot, Narrator};

const OWNER: &str = "data_types_dynamic_memory";

/// Spells "abcd" on a little-endian machine
pub const WORD: Element = 1684234849;

pub fn data_types_dynamic_memory(heap: &mut Heap, out: &mut Narrator) -> Result<(), MemoryError> {
    let mut p = heap.allocate(1, FillRule::Indeterminate, OWNER)?;
    out.indeterminate(format!(
        "Before the first write the value is: {}",
        format_slot(p.get(0))
    ));

    p.set(0, WORD)?;
    heap.observe(&p);

    let view = p.as_bytes();
    out.observed(format!(
        "{} is {}",
        format_slot(p.get(0)),
        format_chars(&view.to_vec())
    ));
    out.observed(format!("Byte order: {}", Endianness::native()));

    heap.release(p);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::LineKind;

    #[test]
    fn test_word_as_characters() {
        let mut heap = Heap::default();
        let mut out = Narrator::new();
        data_types_dynamic_memory(&mut heap, &mut out).unwrap();

        let lines = out.deterministic_output();
        let expected = match Endianness::native() {
            Endianness::Little => "1684234849 is a b c d",
            Endianness::Big => "1684234849 is d c b a",
        };
        assert_eq!(lines[0], expected);
        assert_eq!(lines[1], format!("Byte order: {}", Endianness::native()));
    }

    #[test]
    fn test_uninitialized_read_is_excluded() {
        let mut heap = Heap::default();
        let mut out = Narrator::new();
        data_types_dynamic_memory(&mut heap, &mut out).unwrap();

        assert_eq!(out.lines()[0].kind, LineKind::Indeterminate);
        assert!(!out
            .deterministic_output()
            .iter()
            .any(|l| l.starts_with("Before the first write")));
    }
}
