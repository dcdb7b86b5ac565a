// Driver: runs the routines in a fixed order

use crate::demos::{bytes, dynamic, growth, leaks, Routine};
use crate::errors::MemoryError;
use crate::memory::heap::Heap;
use crate::narration::{History, Narrator, StageSnapshot};
use std::fmt;
use tracing::{debug, info, warn};

/// Position of the driver in its fixed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    ByteSequence,
    DynamicMemory,
    Growth,
    DanglingLeak,
    ScopeLeak,
    End,
}

impl Stage {
    /// Stages that run a routine, in execution order
    pub const ROUTINES: [Stage; 5] = [
        Stage::ByteSequence,
        Stage::DynamicMemory,
        Stage::Growth,
        Stage::DanglingLeak,
        Stage::ScopeLeak,
    ];

    /// The following stage; `End` is terminal
    pub fn next(self) -> Self {
        match self {
            Stage::Start => Stage::ByteSequence,
            Stage::ByteSequence => Stage::DynamicMemory,
            Stage::DynamicMemory => Stage::Growth,
            Stage::Growth => Stage::DanglingLeak,
            Stage::DanglingLeak => Stage::ScopeLeak,
            Stage::ScopeLeak => Stage::End,
            Stage::End => Stage::End,
        }
    }

    /// The routine this stage runs, if any
    pub fn routine(self) -> Option<Routine> {
        match self {
            Stage::ByteSequence => Some(bytes::represent_memory_as_sequence_of_bytes),
            Stage::DynamicMemory => Some(dynamic::data_types_dynamic_memory),
            Stage::Growth => Some(growth::increase_size_of_allocated_memory),
            Stage::DanglingLeak => Some(leaks::memory_leak_example),
            Stage::ScopeLeak => Some(leaks::memory_leak_function_example),
            Stage::Start | Stage::End => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Start => "Start",
            Stage::ByteSequence => "Memory as a sequence of bytes",
            Stage::DynamicMemory => "Data types and dynamic memory",
            Stage::Growth => "Growing an allocation",
            Stage::DanglingLeak => "Leak: lost reference",
            Stage::ScopeLeak => "Leak: missing free before return",
            Stage::End => "Leak summary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Runs every routine once, in order, recording narration and ledger state
pub struct DemoRunner {
    heap: Heap,
    narrator: Narrator,
    history: History,
    stage: Stage,
    finished: bool,
    failure: Option<MemoryError>, // First error; the sequence never resumes after it
}

impl DemoRunner {
    /// Create a runner whose ledger holds at most `heap_limit` bytes at once
    pub fn new(heap_limit: usize) -> Self {
        DemoRunner {
            heap: Heap::new(heap_limit),
            narrator: Narrator::new(),
            history: History::new(),
            stage: Stage::Start,
            finished: false,
            failure: None,
        }
    }

    /// Advance to the next stage and execute it.
    ///
    /// Returns the stage that ran. Once `End` has been narrated this does nothing;
    /// once a stage has failed every call returns that same error.
    pub fn step(&mut self) -> Result<Stage, MemoryError> {
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        if self.finished {
            return Ok(Stage::End);
        }

        let stage = self.stage.next();
        self.stage = stage;
        self.narrator.begin_stage(stage);
        debug!(%stage, "entering stage");

        match stage.routine() {
            Some(routine) => {
                if let Err(e) = routine(&mut self.heap, &mut self.narrator) {
                    warn!(%stage, error = %e, "stage failed, halting");
                    self.failure = Some(e.clone());
                    return Err(e);
                }
            }
            None => {
                self.narrate_leak_summary();
                self.finished = true;
            }
        }

        self.history
            .push(StageSnapshot::capture(stage, &self.heap, &self.narrator));
        Ok(stage)
    }

    /// Run every remaining stage, halting on the first error
    pub fn run(&mut self) -> Result<(), MemoryError> {
        while !self.finished {
            if let Some(e) = &self.failure {
                return Err(e.clone());
            }
            self.step()?;
        }
        info!(
            stages = self.history.len(),
            lines = self.narrator.lines().len(),
            "run complete"
        );
        Ok(())
    }

    fn narrate_leak_summary(&mut self) {
        let summary = self.heap.leak_summary();
        let plural = if summary.blocks == 1 { "" } else { "s" };
        self.narrator.observed(format!(
            "Leak summary: {} block{} ({} bytes) never released",
            summary.blocks, plural, summary.bytes
        ));
        for record in self.heap.records().into_iter().filter(|r| r.is_leaked()) {
            self.narrator.observed(format!(
                "  {} bytes allocated in {} ({})",
                record.size_bytes(),
                record.owner,
                record.state.label()
            ));
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The error that halted the run, if any
    pub fn failure(&self) -> Option<&MemoryError> {
        self.failure.as_ref()
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

impl Default for DemoRunner {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_HEAP_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_sequence() {
        let mut stage = Stage::Start;
        let mut seen = Vec::new();
        while stage != Stage::End {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(&seen[..5], &Stage::ROUTINES);
        assert_eq!(seen.last(), Some(&Stage::End));
        assert_eq!(Stage::End.next(), Stage::End);
    }

    #[test]
    fn test_only_routine_stages_have_routines() {
        assert!(Stage::Start.routine().is_none());
        assert!(Stage::End.routine().is_none());
        assert!(Stage::ROUTINES.iter().all(|s| s.routine().is_some()));
    }

    #[test]
    fn test_step_runs_one_stage_at_a_time() {
        let mut runner = DemoRunner::default();
        assert_eq!(runner.step().unwrap(), Stage::ByteSequence);
        assert_eq!(runner.history().len(), 1);
        assert!(runner
            .narrator()
            .lines()
            .iter()
            .all(|l| l.stage == Stage::ByteSequence));
    }

    #[test]
    fn test_step_after_end_is_a_no_op() {
        let mut runner = DemoRunner::default();
        runner.run().unwrap();
        let lines = runner.narrator().lines().len();
        assert_eq!(runner.step().unwrap(), Stage::End);
        assert_eq!(runner.narrator().lines().len(), lines);
        assert_eq!(runner.history().len(), 6);
    }

    #[test]
    fn test_failure_halts_the_sequence() {
        // Too small for even one element
        let mut runner = DemoRunner::new(2);
        let err = runner.run().unwrap_err();
        assert!(err.is_allocation_failure());
        assert_eq!(runner.stage(), Stage::ByteSequence);
        assert!(!runner.is_finished());
        assert!(runner.history().is_empty());
        assert_eq!(runner.failure(), Some(&err));
    }

    #[test]
    fn test_no_stage_runs_after_a_failure() {
        let mut runner = DemoRunner::new(2);
        let first = runner.step().unwrap_err();
        let lines = runner.narrator().lines().len();

        for _ in 0..3 {
            assert_eq!(runner.step().unwrap_err(), first);
        }
        assert_eq!(runner.run().unwrap_err(), first);
        assert_eq!(runner.stage(), Stage::ByteSequence);
        assert_eq!(runner.narrator().lines().len(), lines);
        assert!(runner.history().is_empty());
    }

    #[test]
    fn test_failure_mid_sequence_keeps_earlier_stages() {
        // Room for the first two routines, not for the growth to 8 elements
        let mut runner = DemoRunner::new(16);
        let err = runner.run().unwrap_err();
        assert!(err.is_allocation_failure());
        assert_eq!(runner.stage(), Stage::Growth);
        assert_eq!(
            runner.history().stages(),
            vec![Stage::ByteSequence, Stage::DynamicMemory]
        );
        assert_eq!(runner.step().unwrap_err(), err);
        assert!(runner.narrator().lines_for(Stage::DanglingLeak).next().is_none());
    }
}
