//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the process
//! panel, and turns key presses into registry producers or panel navigation.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (some process running): polls every ~80ms so progress moves smoothly.
//! - **Idle**: sleeps up to 500ms between polls.
//!
//! Either way a frame is only drawn when an input event arrived or the
//! registry's generation counter moved since the last frame.

mod component;
mod components;
mod event;
mod ui;

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;

use crate::IconStyle;
use crate::core::config::ResolvedConfig;
use crate::core::operation::OperationType;
use crate::core::registry::Registry;
use crate::ops::{SimulatedOp, spawn_simulated};
use crate::tui::component::EventHandler;
use crate::tui::components::{PanelEvent, ProcessPanelState};
use crate::tui::event::{TuiEvent, poll_event_blocking};

/// TUI-specific presentation state (not part of the registry)
pub struct TuiState {
    pub panel: ProcessPanelState,
    pub status_message: String,
    pub icons: IconStyle,
}

impl TuiState {
    pub fn new(icons: IconStyle) -> Self {
        Self {
            panel: ProcessPanelState::new(),
            status_message: String::from("Press c to start a copy"),
            icons,
        }
    }
}

/// Hands out labels like `copy-3` so concurrent operations are told apart.
#[derive(Default)]
struct LabelCounter {
    counts: HashMap<OperationType, usize>,
}

impl LabelCounter {
    fn next(&mut self, op: OperationType) -> String {
        let n = self.counts.entry(op).or_default();
        *n += 1;
        format!("{}-{}", op.verb().to_lowercase(), n)
    }
}

/// Runs the demo until the user quits. Needs the multi-thread runtime,
/// since input polling goes through `block_in_place`.
pub async fn run(config: ResolvedConfig) -> io::Result<()> {
    let mut registry = Registry::new(config.channel_capacity, config.retain_finished);
    registry.start_listening().map_err(io::Error::other)?;

    let mut tui = TuiState::new(config.icons);
    let mut labels = LabelCounter::default();
    let mut producers: Vec<JoinHandle<()>> = Vec::new();

    let mut terminal = ratatui::init();
    let mut last_generation = None;
    let mut needs_redraw = true; // Force first frame

    loop {
        let generation = registry.generation();
        if last_generation != Some(generation) {
            last_generation = Some(generation);
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &registry, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if registry.has_running() {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_blocking(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(|| poll_event_blocking(Duration::ZERO)))
        {
            needs_redraw = true;
            match event {
                TuiEvent::Quit | TuiEvent::ForceQuit => should_quit = true,
                TuiEvent::Resize => {}
                TuiEvent::ToggleFocus => {
                    tui.panel.focused = !tui.panel.focused;
                }
                TuiEvent::ListUp | TuiEvent::ListDown => {
                    if let Some(PanelEvent::SelectionChanged(idx)) = tui.panel.handle_event(&event) {
                        debug!("Process panel selection moved to {}", idx);
                    }
                }
                TuiEvent::Start(op) => {
                    let label = labels.next(op);
                    tui.status_message = format!("Started {label}");
                    let sim = SimulatedOp::new(op, label, config.files_per_operation, config.tick);
                    producers.push(spawn_simulated(sim, registry.sender()));
                }
                TuiEvent::StartFailing => {
                    let label = labels.next(OperationType::Copy);
                    tui.status_message = format!("Started {label} (will fail)");
                    let sim = SimulatedOp::new(
                        OperationType::Copy,
                        label,
                        config.files_per_operation,
                        config.tick,
                    )
                    .failing_at(config.files_per_operation / 2);
                    producers.push(spawn_simulated(sim, registry.sender()));
                }
            }
        }
        producers.retain(|handle| !handle.is_finished());

        if should_quit {
            break;
        }
    }

    ratatui::restore();

    info!("Shutting down, aborting {} producer(s)", producers.len());
    for handle in &producers {
        handle.abort();
    }
    settle_producers(producers).await;
    registry.stop_listening().await.map_err(io::Error::other)?;
    Ok(())
}

/// Waits for aborted producers and logs any that ended other than by
/// cancellation. Returns how many did.
async fn settle_producers(producers: Vec<JoinHandle<()>>) -> usize {
    let mut abnormal = 0;
    for result in futures::future::join_all(producers).await {
        if let Err(e) = result
            && !e.is_cancelled()
        {
            debug!("Producer task ended abnormally: {}", e);
            abnormal += 1;
        }
    }
    abnormal
}
