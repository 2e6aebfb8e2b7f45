//! # Process Registry
//!
//! Owns every tracked process and serializes all writes through one
//! bounded channel drained by a single listener task.
//!
//! ```text
//!  copy task ─┐
//!  zip task  ─┼─ ProcessSender ──▶ mpsc (bounded) ──▶ listener ──write──▶ RwLock<ProcessStore>
//!  rm task   ─┘                                                              │
//!                                         render pass ◀──────────read────────┘
//! ```
//!
//! The listener is the only writer. Render calls take the read side of the
//! lock, so a frame always sees whole `Process` values.
//!
//! Producers pick an admission mode per send:
//! - [`SendMode::Wait`] waits for channel space. Use it for events that must
//!   not be lost (registration, final state).
//! - [`SendMode::Try`] fails fast with [`RegistryError::ChannelFull`]. Use it
//!   for frequent progress ticks.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::core::message::{Flow, MsgBody, UpdateMsg};
use crate::core::operation::OperationType;
use crate::core::process::{Process, ProcessState};
use crate::core::store::ProcessStore;
use crate::core::viewport::{PanelView, Viewport, ViewportError};

/// Enough room for bursts from 5-10 active processes.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 50;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum RegistryError {
    /// Non-blocking send found the channel full. The caller decides whether to drop or retry.
    ChannelFull,
    /// The listener has stopped and no longer receives.
    ChannelClosed,
    ProcessAlreadyExists { id: String },
    NoProcessFound { id: String },
    /// A finished process was sent back to `InOperation`.
    InvalidTransition {
        id: String,
        from: ProcessState,
        to: ProcessState,
    },
    ListenerAlreadyStarted,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::ChannelFull => write!(f, "process channel is full"),
            RegistryError::ChannelClosed => write!(f, "process channel is closed"),
            RegistryError::ProcessAlreadyExists { id } => {
                write!(f, "process with id {id} already exists")
            }
            RegistryError::NoProcessFound { id } => write!(f, "no process with id {id}"),
            RegistryError::InvalidTransition { id, from, to } => {
                write!(f, "process {id} cannot move from {from:?} to {to:?}")
            }
            RegistryError::ListenerAlreadyStarted => write!(f, "listener was already started"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl<T> From<TrySendError<T>> for RegistryError {
    fn from(e: TrySendError<T>) -> Self {
        match e {
            TrySendError::Full(_) => RegistryError::ChannelFull,
            TrySendError::Closed(_) => RegistryError::ChannelClosed,
        }
    }
}

// ============================================================================
// Producer handle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// Wait until the channel has room.
    Wait,
    /// Return `ChannelFull` instead of waiting.
    Try,
}

/// Cheap, cloneable handle file operations use to report progress.
#[derive(Debug, Clone)]
pub struct ProcessSender {
    tx: mpsc::Sender<UpdateMsg>,
    req_cnt: Arc<AtomicU64>,
}

impl ProcessSender {
    fn next_req_id(&self) -> u64 {
        self.req_cnt.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn send_msg(&self, body: MsgBody, mode: SendMode) -> Result<u64, RegistryError> {
        let msg = UpdateMsg::new(self.next_req_id(), body);
        let req_id = msg.req_id;
        match mode {
            SendMode::Wait => self
                .tx
                .send(msg)
                .await
                .map_err(|_| RegistryError::ChannelClosed)?,
            SendMode::Try => self.tx.try_send(msg)?,
        }
        Ok(req_id)
    }

    /// Allocate an ID and queue a new process. The returned `Process` is the
    /// caller's handle for later updates.
    pub async fn register_new(
        &self,
        name: impl Into<String>,
        operation: OperationType,
        total: usize,
        mode: SendMode,
    ) -> Result<Process, RegistryError> {
        let p = Process::new(uuid::Uuid::new_v4().to_string(), name, operation, total);
        self.send_new(&p, mode).await?;
        Ok(p)
    }

    /// Queue a caller-built process for insertion. A duplicate ID is
    /// rejected by the listener, not here.
    pub async fn send_new(&self, p: &Process, mode: SendMode) -> Result<(), RegistryError> {
        let req_id = self
            .send_msg(MsgBody::NewProcess(p.clone()), mode)
            .await?;
        debug!("Queued new process {} (req_id={})", p.id, req_id);
        Ok(())
    }

    /// Queue the handle's current values as an update.
    pub async fn send_update(&self, p: &Process, mode: SendMode) -> Result<(), RegistryError> {
        self.send_msg(MsgBody::UpdateProcess(p.clone()), mode)
            .await
            .map(|_| ())
    }

    /// Fire-and-forget progress tick. A full channel drops the update.
    pub fn try_send_update(&self, p: &Process) {
        let msg = UpdateMsg::new(self.next_req_id(), MsgBody::UpdateProcess(p.clone()));
        let req_id = msg.req_id;
        if let Err(e) = self.tx.try_send(msg) {
            error!(
                "Failed to send message to channel (req_id={}): {}",
                req_id,
                RegistryError::from(e)
            );
        }
    }

    pub(crate) async fn send_stop(&self) -> Result<(), RegistryError> {
        self.send_msg(MsgBody::StopListening, SendMode::Wait)
            .await
            .map(|_| ())
    }
}

// ============================================================================
// Registry
// ============================================================================

pub struct Registry {
    store: Arc<RwLock<ProcessStore>>,
    sender: ProcessSender,
    rx: Option<mpsc::Receiver<UpdateMsg>>,
    listener: Option<JoinHandle<()>>,
    listening: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY, None)
    }
}

impl Registry {
    pub fn new(channel_capacity: usize, retain_finished: Option<usize>) -> Self {
        let (tx, rx) = mpsc::channel(channel_capacity.max(1));
        Self {
            store: Arc::new(RwLock::new(ProcessStore::new(retain_finished))),
            sender: ProcessSender {
                tx,
                req_cnt: Arc::new(AtomicU64::new(0)),
            },
            rx: Some(rx),
            listener: None,
            listening: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Spawn the listener task. Must run inside a Tokio runtime, once per registry.
    pub fn start_listening(&mut self) -> Result<(), RegistryError> {
        let rx = self.rx.take().ok_or(RegistryError::ListenerAlreadyStarted)?;
        self.listening.store(true, Ordering::Release);
        self.listener = Some(tokio::spawn(listen(
            rx,
            Arc::clone(&self.store),
            Arc::clone(&self.listening),
            Arc::clone(&self.generation),
        )));
        info!("Process registry listener started");
        Ok(())
    }

    /// Queue `StopListening`, waiting for room, then wait for the listener
    /// to drain everything sent before it.
    pub async fn stop_listening(&mut self) -> Result<(), RegistryError> {
        let Some(handle) = self.listener.take() else {
            warn!("stop_listening called without a running listener");
            return Ok(());
        };
        self.sender.send_stop().await?;
        if let Err(e) = handle.await {
            error!("Process registry listener ended abnormally: {}", e);
        }
        info!("Process registry listener stopped");
        Ok(())
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }

    pub fn sender(&self) -> ProcessSender {
        self.sender.clone()
    }

    pub async fn register_new(
        &self,
        name: impl Into<String>,
        operation: OperationType,
        total: usize,
        mode: SendMode,
    ) -> Result<Process, RegistryError> {
        self.sender.register_new(name, operation, total, mode).await
    }

    pub async fn send_update(&self, p: &Process, mode: SendMode) -> Result<(), RegistryError> {
        self.sender.send_update(p, mode).await
    }

    /// Bumped after every applied message. Lets the UI skip redundant redraws.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn read(&self) -> RwLockReadGuard<'_, ProcessStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: &str) -> Option<Process> {
        self.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn has_running(&self) -> bool {
        self.read().has_running()
    }

    pub fn running_count(&self) -> usize {
        self.read().running_count()
    }

    /// Every process in panel order.
    pub fn snapshot(&self) -> Vec<Process> {
        self.read().sorted()
    }

    /// The processes visible through `viewport`, plus cursor metadata.
    pub fn view(&self, viewport: &Viewport, visible: usize) -> Result<PanelView, ViewportError> {
        PanelView::window(self.snapshot(), viewport, visible)
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.take() {
            warn!("Registry dropped while listening, aborting listener");
            handle.abort();
        }
    }
}

async fn listen(
    mut rx: mpsc::Receiver<UpdateMsg>,
    store: Arc<RwLock<ProcessStore>>,
    listening: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
) {
    loop {
        let Some(msg) = rx.recv().await else {
            debug!("Channel closed, stopping listener");
            break;
        };
        let req_id = msg.req_id;
        debug!("Received message (req_id={})", req_id);

        let (flow, result) = {
            let mut guard = store.write().unwrap_or_else(PoisonError::into_inner);
            msg.apply(&mut guard)
        };
        if flow == Flow::Stop {
            break;
        }
        match result {
            Ok(()) => {
                generation.fetch_add(1, Ordering::AcqRel);
            }
            Err(e) => error!(
                "Could not apply update to process registry (req_id={}): {}",
                req_id, e
            ),
        }
    }
    listening.store(false, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_idle() {
        let r = Registry::default();
        assert!(!r.is_listening());
        assert!(r.is_empty());
        assert_eq!(r.generation(), 0);
        assert!(!r.has_running());
    }

    #[test]
    fn test_request_ids_increase() {
        let r = Registry::default();
        let s = r.sender();
        assert_eq!(s.next_req_id(), 1);
        assert_eq!(r.sender().next_req_id(), 2);
    }

    #[tokio::test]
    async fn test_start_listening_twice_fails() {
        let mut r = Registry::default();
        r.start_listening().unwrap();
        assert!(r.is_listening());
        assert!(matches!(
            r.start_listening(),
            Err(RegistryError::ListenerAlreadyStarted)
        ));
        r.stop_listening().await.unwrap();
        assert!(!r.is_listening());
    }

    #[tokio::test]
    async fn test_try_send_on_full_channel() {
        let r = Registry::new(1, None);
        r.register_new("a", OperationType::Copy, 1, SendMode::Try)
            .await
            .unwrap();
        let err = r
            .register_new("b", OperationType::Copy, 1, SendMode::Try)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ChannelFull));
    }

    #[test]
    fn test_error_display() {
        let err = RegistryError::NoProcessFound { id: "x".into() };
        assert_eq!(err.to_string(), "no process with id x");
    }
}
