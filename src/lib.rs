//! # Introduction
//!
//! heapwalk narrates five short routines that allocate, reinterpret, grow and
//! leak heap memory by hand. Each routine owns its blocks outright; nothing is
//! shared between them and they always run in the same order.
//!
//! ## Pipeline
//!
//! ```text
//! DemoRunner → routine → Heap / RawBlock → Narrator → stdout (or the viewer)
//! ```
//!
//! 1. [`memory`]: [`memory::block::RawBlock`] owns storage from the global
//!    allocator; [`memory::view::ByteView`] reads it as bytes;
//!    [`memory::heap::Heap`] issues blocks and keeps a ledger of their fate.
//! 2. [`demos`]: the five routines.
//! 3. [`runner`]: the fixed `Start → … → End` sequence and its history.
//! 4. [`narration`]: recorded output lines, split into stable text and
//!    run-dependent text (addresses, indeterminate reads).
//! 5. [`ui`]: optional ratatui viewer over a recorded run.
//!
//! ## Leaks
//!
//! Two routines leak on purpose. [`memory::block::RawBlock`] has no `Drop`
//! impl, so the leaks are real and stay leaked until the process exits; the
//! ledger only reports them.

pub mod config;
pub mod constants;
pub mod demos;
pub mod errors;
pub mod logging;
pub mod memory;
pub mod narration;
pub mod runner;
pub mod ui;
