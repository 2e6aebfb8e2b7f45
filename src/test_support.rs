//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use chrono::{DateTime, Local};

use crate::core::operation::OperationType;
use crate::core::process::{Process, ProcessState};

/// Builds a process with explicit progress fields.
pub fn process_with(
    id: &str,
    state: ProcessState,
    done: usize,
    total: usize,
    done_time: Option<DateTime<Local>>,
) -> Process {
    Process {
        state,
        done,
        done_time,
        ..Process::new(id, id, OperationType::Copy, total)
    }
}

/// `count` in-flight processes with IDs "0", "1", ...
pub fn processes(count: usize) -> Vec<Process> {
    (0..count)
        .map(|i| {
            let id = i.to_string();
            Process::new(id.clone(), id, OperationType::Copy, 10)
        })
        .collect()
}
