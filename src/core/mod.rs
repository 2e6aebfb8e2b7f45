//! # Core Process Registry
//!
//! Tracks long-running file operations. It knows nothing about any
//! specific UI technology.
//!
//! ```text
//!     ┌───────────┐  ┌───────────┐  ┌───────────┐
//!     │ copy task │  │ zip task  │  │  rm task  │     producers
//!     └─────┬─────┘  └─────┬─────┘  └─────┬─────┘
//!           └──────────────┼──────────────┘
//!                          ▼  UpdateMsg
//!                ┌───────────────────┐
//!                │     Registry      │
//!                │  channel → store  │   single writer
//!                └─────────┬─────────┘
//!                          ▼  PanelView
//!                ┌───────────────────┐
//!                │   TUI adapter     │   foreground reader
//!                └───────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`operation`]: operation kinds with their icons and verbs
//! - [`process`]: the `Process` entity and its display ordering
//! - [`store`]: the ID → `Process` map
//! - [`message`]: the `UpdateMsg` protocol
//! - [`registry`]: channel, listener task and producer handle
//! - [`viewport`]: cursor and scroll window arithmetic
//! - [`config`]: settings

pub mod config;
pub mod message;
pub mod operation;
pub mod process;
pub mod registry;
pub mod store;
pub mod viewport;
