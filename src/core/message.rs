//! # Update Messages
//!
//! Everything a producer can ask of the registry becomes an `UpdateMsg`.
//! The listener applies them one at a time, in channel order.
//!
//! ```text
//! Producer ──UpdateMsg──▶ channel ──▶ listener ──apply()──▶ ProcessStore
//! ```

use crate::core::process::Process;
use crate::core::registry::RegistryError;
use crate::core::store::ProcessStore;

#[derive(Debug, Clone, PartialEq)]
pub enum MsgBody {
    /// Start tracking a process. Its ID must be new.
    NewProcess(Process),
    /// Replace a tracked process. Its ID must already exist.
    UpdateProcess(Process),
    /// End the listener loop.
    StopListening,
}

/// A message plus the request id used to correlate it in logs.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMsg {
    pub req_id: u64,
    pub body: MsgBody,
}

/// What the listener should do after applying a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

impl UpdateMsg {
    pub fn new(req_id: u64, body: MsgBody) -> Self {
        Self { req_id, body }
    }

    /// Apply this message to the store.
    ///
    /// Errors are for logging only: the sender has already moved on by the
    /// time the listener gets here.
    pub fn apply(self, store: &mut ProcessStore) -> (Flow, Result<(), RegistryError>) {
        match self.body {
            MsgBody::NewProcess(p) => (Flow::Continue, store.add(p)),
            MsgBody::UpdateProcess(p) => (Flow::Continue, store.update_existing(p)),
            MsgBody::StopListening => (Flow::Stop, Ok(())),
        }
    }
}
