//! Viewer state and event loop

use crate::constants::UI_POLL_MS;
use crate::narration::StageSnapshot;
use crate::runner::DemoRunner;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Narration,
    Heap,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Narration => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Narration,
        }
    }
}

/// The viewer state
pub struct App {
    /// The recorded run
    pub runner: DemoRunner,

    /// Index into the runner's history
    pub position: usize,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub narration_scroll: usize,
    pub heap_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Set when the run stopped on an error
    pub halted: bool,
}

impl App {
    /// Create a viewer over `runner`, positioned at the first recorded stage
    pub fn new(runner: DemoRunner) -> Self {
        let halted = runner.failure().is_some();
        App {
            runner,
            position: 0,
            focused_pane: FocusedPane::Narration,
            narration_scroll: 0,
            heap_scroll: 0,
            should_quit: false,
            status_message: if halted {
                String::from("Run halted early")
            } else {
                String::from("Ready!")
            },
            halted,
        }
    }

    /// Run the event loop until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(UI_POLL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Halted run viewed at its last recorded stage
    fn shows_failed_stage(&self) -> bool {
        self.halted && self.position + 1 >= self.runner.history().len()
    }

    fn current(&self) -> Option<&StageSnapshot> {
        self.runner.history().get(self.position)
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        let snapshot = self.runner.history().get(self.position);
        let all_lines = self.runner.narrator().lines();
        let line_count = if self.shows_failed_stage() {
            // Lines narrated by the stage that failed have no snapshot of their own
            all_lines.len()
        } else {
            snapshot.map_or(0, |s| s.line_count)
        };
        let lines = &all_lines[..line_count];

        super::panes::render_narration_pane(
            frame,
            columns[0],
            lines,
            self.focused_pane == FocusedPane::Narration,
            &mut self.narration_scroll,
        );

        super::panes::render_heap_pane(
            frame,
            columns[1],
            snapshot.map(|s| s.records.as_slice()).unwrap_or(&[]),
            snapshot.map_or(0, |s| s.bytes_in_use),
            snapshot.map_or(0, |s| s.heap_limit),
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.position,
            self.runner.history().len(),
            snapshot.map(|s| s.stage),
            self.halted,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Right => self.step_forward(),
            KeyCode::Left => self.step_backward(),
            KeyCode::Home | KeyCode::Backspace => {
                self.jump_to(0);
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::End | KeyCode::Enter => {
                let last = self.runner.history().len().saturating_sub(1);
                self.jump_to(last);
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Narration => {
                    self.narration_scroll = self.narration_scroll.saturating_sub(1)
                }
                FocusedPane::Heap => self.heap_scroll = self.heap_scroll.saturating_sub(1),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Narration => {
                    self.narration_scroll = self.narration_scroll.saturating_add(1)
                }
                FocusedPane::Heap => self.heap_scroll = self.heap_scroll.saturating_add(1),
            },
            _ => {}
        }
    }

    fn jump_to(&mut self, position: usize) {
        self.position = position;
        // Keep the newest narration in view
        self.narration_scroll = usize::MAX;
        self.heap_scroll = 0;
    }

    fn step_forward(&mut self) {
        if self.position + 1 < self.runner.history().len() {
            self.jump_to(self.position + 1);
            self.status_message = match self.current() {
                Some(s) => format!("Ran {}", s.stage.title()),
                None => "Stepped forward".to_string(),
            };
        } else {
            self.status_message = "Already at the last stage".to_string();
        }
    }

    fn step_backward(&mut self) {
        if self.position > 0 {
            self.jump_to(self.position - 1);
            self.status_message = "Stepped backward".to_string();
        } else {
            self.status_message = "Already at the first stage".to_string();
        }
    }
}
