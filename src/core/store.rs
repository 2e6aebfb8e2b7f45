//! # Process Store
//!
//! The ID → `Process` mapping behind the registry. Plain synchronous data;
//! the registry decides who gets to mutate it.

use std::collections::HashMap;

use log::debug;

use crate::core::process::{Process, display_order};
use crate::core::registry::RegistryError;

#[derive(Debug, Default)]
pub struct ProcessStore {
    processes: HashMap<String, Process>,
    /// Cap on finished entries kept around. `None` keeps everything.
    retain_finished: Option<usize>,
}

impl ProcessStore {
    pub fn new(retain_finished: Option<usize>) -> Self {
        Self {
            processes: HashMap::new(),
            retain_finished,
        }
    }

    /// Insert a new process. Fails if the ID is already tracked.
    pub fn add(&mut self, p: Process) -> Result<(), RegistryError> {
        if self.processes.contains_key(&p.id) {
            return Err(RegistryError::ProcessAlreadyExists { id: p.id });
        }
        self.insert(p);
        Ok(())
    }

    pub fn add_or_update(&mut self, p: Process) {
        self.insert(p);
    }

    /// Replace a tracked process wholesale.
    ///
    /// A process that already reached a terminal state cannot go back to
    /// `InOperation`, and its `done_time` is kept from the first time it
    /// finished.
    pub fn update_existing(&mut self, mut p: Process) -> Result<(), RegistryError> {
        let Some(stored) = self.processes.get(&p.id) else {
            return Err(RegistryError::NoProcessFound { id: p.id });
        };
        if stored.is_finished() && !p.is_finished() {
            return Err(RegistryError::InvalidTransition {
                id: p.id,
                from: stored.state,
                to: p.state,
            });
        }
        if stored.done_time.is_some() {
            p.done_time = stored.done_time;
        }
        self.insert(p);
        Ok(())
    }

    /// Stamps `done_time` on a finished process that arrives without one.
    fn insert(&mut self, mut p: Process) {
        let finished = p.is_finished();
        if finished && p.done_time.is_none() {
            p.done_time = Some(chrono::Local::now());
        }
        self.processes.insert(p.id.clone(), p);
        if finished {
            self.evict_finished();
        }
    }

    pub fn get(&self, id: &str) -> Option<&Process> {
        self.processes.get(id)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn has_running(&self) -> bool {
        self.processes.values().any(Process::is_running)
    }

    pub fn running_count(&self) -> usize {
        self.processes.values().filter(|p| p.is_running()).count()
    }

    /// All processes in panel order. Rebuilt on every call.
    pub fn sorted(&self) -> Vec<Process> {
        let mut list: Vec<Process> = self.processes.values().cloned().collect();
        list.sort_by(display_order);
        list
    }

    fn evict_finished(&mut self) {
        let Some(cap) = self.retain_finished else {
            return;
        };
        let mut finished: Vec<(Option<chrono::DateTime<chrono::Local>>, String)> = self
            .processes
            .values()
            .filter(|p| p.is_finished())
            .map(|p| (p.done_time, p.id.clone()))
            .collect();
        if finished.len() <= cap {
            return;
        }
        finished.sort();
        let excess = finished.len() - cap;
        for (_, id) in finished.into_iter().take(excess) {
            debug!("Evicting finished process {}", id);
            self.processes.remove(&id);
        }
    }
}
