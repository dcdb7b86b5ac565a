// Narration recording and per-stage history

use crate::memory::heap::{BlockRecord, Heap};
use crate::memory::Element;
use crate::runner::Stage;
use std::io::{self, Write};

/// What a narration line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Counts, values and bytes: identical on every run
    Observed,
    /// Fixed explanatory sentence
    Explanation,
    /// Contains an address; differs between runs
    Address,
    /// Result of reading memory that was never written
    Indeterminate,
}

impl LineKind {
    /// Whether the line can be compared across runs and platforms
    pub fn is_deterministic(self) -> bool {
        matches!(self, LineKind::Observed | LineKind::Explanation)
    }
}

/// One line of narration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationLine {
    pub stage: Stage,
    pub kind: LineKind,
    pub text: String,
}

/// Records every line the routines narrate
#[derive(Debug, Clone)]
pub struct Narrator {
    lines: Vec<NarrationLine>,
    stage: Stage,
}

impl Narrator {
    pub fn new() -> Self {
        Narrator {
            lines: Vec::new(),
            stage: Stage::Start,
        }
    }

    /// Attribute subsequent lines to `stage`
    pub fn begin_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    fn push(&mut self, kind: LineKind, text: String) {
        self.lines.push(NarrationLine {
            stage: self.stage,
            kind,
            text,
        });
    }

    pub fn observed(&mut self, text: impl Into<String>) {
        self.push(LineKind::Observed, text.into());
    }

    pub fn explain(&mut self, text: impl Into<String>) {
        self.push(LineKind::Explanation, text.into());
    }

    /// Narrate `label: <address>`
    pub fn address<T>(&mut self, label: &str, ptr: *const T) {
        self.push(LineKind::Address, format!("{}: {:p}", label, ptr));
    }

    pub fn indeterminate(&mut self, text: impl Into<String>) {
        self.push(LineKind::Indeterminate, text.into());
    }

    pub fn lines(&self) -> &[NarrationLine] {
        &self.lines
    }

    /// Lines attributed to `stage`
    pub fn lines_for(&self, stage: Stage) -> impl Iterator<Item = &NarrationLine> + '_ {
        self.lines.iter().filter(move |l| l.stage == stage)
    }

    /// Text of the lines that are stable across runs (no addresses, no indeterminate reads)
    pub fn deterministic_output(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter(|l| l.kind.is_deterministic())
            .map(|l| l.text.clone())
            .collect()
    }

    /// Write one stage's lines followed by a blank separator line
    pub fn write_stage<W: Write>(&self, stage: Stage, out: &mut W) -> io::Result<()> {
        for line in self.lines_for(stage) {
            writeln!(out, "{}", line.text)?;
        }
        writeln!(out)
    }
}

impl Default for Narrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render slots as `[ 1 2 3 ]`, `?` for indeterminate ones
pub fn format_slots(values: &[Option<Element>]) -> String {
    let mut text = String::from("[ ");
    for value in values {
        match value {
            Some(v) => text.push_str(&format!("{} ", v)),
            None => text.push_str("? "),
        }
    }
    text.push(']');
    text
}

/// Render a single slot, spelling out indeterminate values
pub fn format_slot(value: Option<Element>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "indeterminate".to_string(),
    }
}

/// State captured after a stage completes
#[derive(Debug, Clone)]
pub struct StageSnapshot {
    pub stage: Stage,
    pub records: Vec<BlockRecord>,
    pub line_count: usize, // Narration lines recorded so far
    pub bytes_in_use: usize,
    pub heap_limit: usize,
}

impl StageSnapshot {
    pub fn capture(stage: Stage, heap: &Heap, narrator: &Narrator) -> Self {
        StageSnapshot {
            stage,
            records: heap.records().into_iter().cloned().collect(),
            line_count: narrator.lines().len(),
            bytes_in_use: heap.bytes_in_use(),
            heap_limit: heap.max_bytes(),
        }
    }
}

/// Snapshots in the order the stages ran
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<StageSnapshot>,
}

impl History {
    pub fn new() -> Self {
        History {
            snapshots: Vec::new(),
        }
    }

    pub fn push(&mut self, snapshot: StageSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn get(&self, index: usize) -> Option<&StageSnapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Stages in the order they were captured
    pub fn stages(&self) -> Vec<Stage> {
        self.snapshots.iter().map(|s| s.stage).collect()
    }
}
