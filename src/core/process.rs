//! # Process
//!
//! One tracked file operation and its progress.
//!
//! ```text
//!               ┌──────────────┐
//!   new() ────▶ │ InOperation  │ ── tick()/set_current_file() ──┐
//!               └──────┬───────┘ ◀──────────────────────────────┘
//!                      │ succeed() / cancel() / fail()
//!        ┌─────────────┼──────────────┐
//!        ▼             ▼              ▼
//!   Successful     Cancelled        Failed        (terminal)
//! ```
//!
//! Producers own their copy of a `Process` and push it to the registry
//! whole. The registry keeps the last copy it received per ID.

use std::cmp::Ordering;

use chrono::{DateTime, Local};

use crate::IconStyle;
use crate::core::operation::{OperationType, glyph, icon_space};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProcessState {
    #[default]
    InOperation,
    Successful,
    Cancelled,
    Failed,
}

impl ProcessState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProcessState::InOperation)
    }

    pub fn icon(self, style: IconStyle) -> &'static str {
        match (style, self) {
            (IconStyle::NerdFont, ProcessState::InOperation) => glyph::IN_OPERATION,
            (IconStyle::NerdFont, ProcessState::Successful) => glyph::DONE,
            (IconStyle::NerdFont, ProcessState::Cancelled) => glyph::ERROR,
            (IconStyle::NerdFont, ProcessState::Failed) => glyph::WARN,
            (IconStyle::Plain, ProcessState::InOperation) => "..",
            (IconStyle::Plain, ProcessState::Successful) => "ok",
            (IconStyle::Plain, ProcessState::Cancelled) => "x",
            (IconStyle::Plain, ProcessState::Failed) => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub id: String,
    pub name: String,
    pub current_file: String,
    /// Only set for `Cancelled` and `Failed`.
    pub error_msg: Option<String>,
    pub operation: OperationType,
    pub state: ProcessState,
    /// Zero means a directory-only operation, drawn as complete.
    pub total: usize,
    pub done: usize,
    pub done_time: Option<DateTime<Local>>,
}

impl Process {
    pub fn new(id: impl Into<String>, name: impl Into<String>, operation: OperationType, total: usize) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            current_file: name.clone(),
            name,
            error_msg: None,
            operation,
            state: ProcessState::InOperation,
            total,
            done: 0,
            done_time: None,
        }
    }

    /// Fraction of work completed, in `0.0..=1.0`.
    pub fn completion(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.done as f64 / self.total as f64).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Still in operation and with work left to do.
    pub fn is_running(&self) -> bool {
        self.state == ProcessState::InOperation && self.done != self.total
    }

    pub fn set_current_file(&mut self, file: impl Into<String>) {
        self.current_file = file.into();
    }

    /// Mark one more unit of work done while processing `file`.
    pub fn tick(&mut self, file: impl Into<String>) {
        self.current_file = file.into();
        self.done = self.done.saturating_add(1);
    }

    pub fn succeed(&mut self) {
        self.done = self.total;
        self.finish(ProcessState::Successful, None);
    }

    pub fn cancel(&mut self, reason: impl Into<String>) {
        self.finish(ProcessState::Cancelled, Some(reason.into()));
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.finish(ProcessState::Failed, Some(reason.into()));
    }

    fn finish(&mut self, state: ProcessState, error_msg: Option<String>) {
        self.state = state;
        self.error_msg = error_msg;
        if self.done_time.is_none() {
            self.done_time = Some(Local::now());
        }
    }

    /// Single-line label for the panel.
    pub fn display_name(&self, style: IconStyle) -> String {
        let icon = self.operation.icon(style);
        let space = icon_space(style);

        if self.is_finished()
            && self.state != ProcessState::Successful
            && let Some(msg) = self.error_msg.as_deref().filter(|m| !m.is_empty())
        {
            return format!("{icon}{space}{} cancelled : {msg}", self.operation.verb());
        }

        if self.state == ProcessState::InOperation {
            return format!("{icon}{space}{} {}", self.operation.verb(), self.current_file);
        }

        if self.total > 1 {
            format!("{icon}{space}{} {} files", self.operation.past_verb(), self.total)
        } else {
            format!("{icon}{space}{} {}", self.operation.past_verb(), self.current_file)
        }
    }
}

/// Panel ordering: unfinished first, least complete on top; then finished,
/// most recent first. Ties break on ID so the order is stable per frame.
pub fn display_order(a: &Process, b: &Process) -> Ordering {
    let by_group = match (a.is_finished(), b.is_finished()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => a.completion().total_cmp(&b.completion()),
        (true, true) => b.done_time.cmp(&a.done_time),
    };
    by_group.then_with(|| a.id.cmp(&b.id))
}
