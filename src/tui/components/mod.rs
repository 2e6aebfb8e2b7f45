//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: top status bar with process counts
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `ProcessPanel`: scrollable, sorted process list with cursor
//!
//! Each component file holds its state type, event type, rendering,
//! event handling and tests.

mod title_bar;
pub use title_bar::TitleBar;

pub mod process_panel;
pub use process_panel::{PanelEvent, ProcessPanel, ProcessPanelState};
