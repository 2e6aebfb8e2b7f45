//! Simulated file operations.
//!
//! Each one registers itself with a waiting send, reports every file with a
//! non-blocking tick, and finishes with a waiting send carrying the final
//! state. That is the send pattern a real copy or zip routine follows.

use std::time::Duration;

use log::{error, info, warn};
use tokio::task::JoinHandle;

use crate::core::operation::OperationType;
use crate::core::process::Process;
use crate::core::registry::{ProcessSender, RegistryError, SendMode};

#[derive(Debug, Clone)]
pub struct SimulatedOp {
    pub operation: OperationType,
    pub label: String,
    pub files: Vec<String>,
    pub tick: Duration,
    /// Fail when reaching this file index.
    pub fail_at: Option<usize>,
}

impl SimulatedOp {
    pub fn new(operation: OperationType, label: impl Into<String>, file_count: usize, tick: Duration) -> Self {
        let label = label.into();
        let files = (0..file_count)
            .map(|i| format!("{label}-{i:03}.dat"))
            .collect();
        Self {
            operation,
            label,
            files,
            tick,
            fail_at: None,
        }
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Run to completion, returning the final process as last sent.
    pub async fn run(self, sender: ProcessSender) -> Result<Process, RegistryError> {
        let mut p = sender
            .register_new(&self.label, self.operation, self.files.len(), SendMode::Wait)
            .await?;
        info!(
            "Started simulated {:?} '{}' ({} files, id={})",
            self.operation,
            self.label,
            self.files.len(),
            p.id
        );

        for (i, file) in self.files.iter().enumerate() {
            tokio::time::sleep(self.tick).await;
            if self.fail_at == Some(i) {
                warn!("Simulated {:?} '{}' failed at {}", self.operation, self.label, file);
                p.set_current_file(file.as_str());
                p.fail(format!("could not read {file}"));
                sender.send_update(&p, SendMode::Wait).await?;
                return Ok(p);
            }
            p.tick(file.as_str());
            sender.try_send_update(&p);
        }

        p.succeed();
        sender.send_update(&p, SendMode::Wait).await?;
        info!("Finished simulated {:?} '{}'", self.operation, self.label);
        Ok(p)
    }
}

/// Spawn `op` on the runtime. Send errors are logged, never propagated to the UI.
pub fn spawn_simulated(op: SimulatedOp, sender: ProcessSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let label = op.label.clone();
        if let Err(e) = op.run(sender).await {
            error!("Simulated operation '{}' could not report: {}", label, e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::process::ProcessState;
    use crate::core::registry::Registry;

    #[tokio::test]
    async fn test_run_reports_success() {
        let mut registry = Registry::default();
        registry.start_listening().unwrap();

        let op = SimulatedOp::new(OperationType::Copy, "photos", 4, Duration::from_millis(1));
        let last = op.run(registry.sender()).await.unwrap();
        registry.stop_listening().await.unwrap();

        let stored = registry.get(&last.id).unwrap();
        assert_eq!(stored.state, ProcessState::Successful);
        assert_eq!(stored.done, 4);
        assert!(stored.done_time.is_some());
        assert!(!registry.has_running());
    }

    #[tokio::test]
    async fn test_run_reports_failure() {
        let mut registry = Registry::default();
        registry.start_listening().unwrap();

        let op = SimulatedOp::new(OperationType::Extract, "dump", 5, Duration::from_millis(1))
            .failing_at(2);
        let last = op.run(registry.sender()).await.unwrap();
        registry.stop_listening().await.unwrap();

        let stored = registry.get(&last.id).unwrap();
        assert_eq!(stored.state, ProcessState::Failed);
        assert_eq!(stored.done, 2);
        assert_eq!(stored.error_msg.as_deref(), Some("could not read dump-002.dat"));
    }

    #[test]
    fn test_file_names() {
        let op = SimulatedOp::new(OperationType::Delete, "tmp", 2, Duration::ZERO);
        assert_eq!(op.files, ["tmp-000.dat", "tmp-001.dat"]);
    }
}
