//! The five allocation routines
//!
//! Each routine owns every block it allocates, narrates what it does, and shares
//! nothing with the others. They run in a fixed order under [`crate::runner`].
//!
//! - [`bytes`]: a single heap integer, read by dereference and by index
//! - [`dynamic`]: an indeterminate read, then one word reinterpreted as bytes
//! - [`growth`]: filling a block, then growing it with realloc semantics
//! - [`leaks`]: losing the only reference, and returning without freeing

pub mod bytes;
pub mod dynamic;
pub mod growth;
pub mod leaks;

use crate::errors::MemoryError;
use crate::memory::heap::Heap;
use crate::narration::Narrator;

/// Signature shared by every routine
pub type Routine = fn(&mut Heap, &mut Narrator) -> Result<(), MemoryError>;
