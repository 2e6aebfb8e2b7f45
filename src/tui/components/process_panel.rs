//! # Process Panel Component
//!
//! Bordered list of tracked processes, three rows each:
//!
//! ```text
//! ┌ Processes ───────────────────────┐
//! │┃ 󰆏 Copying photos-004.dat      󰥔 │  name line (cursor marker, name, state icon)
//! │┃ ██████████░░░░░░░░░░░░░░  40%   │  progress line
//! │                                  │  separator
//! │  󰆴 Deleted 12 files             │
//! │  ████████████████████████ 100%   │
//! └──────────────────────────── 1/2 ┘
//! ```
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ProcessPanelState` lives in `TuiState`
//! - `ProcessPanel` is created each frame with borrowed state and the registry

use log::{error, warn};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::IconStyle;
use crate::core::process::{Process, ProcessState};
use crate::core::registry::Registry;
use crate::core::viewport::{PanelView, Viewport, ViewportError, renderable_count};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const MIN_WIDTH: u16 = 2;
pub const MIN_HEIGHT: u16 = 2;
const BORDER_SIZE: u16 = 2;
const PROGRESS_BAR_RIGHT_PADDING: usize = 3;
/// Room kept for the ellipsis and the state icon after a process name.
const NAME_TRUNCATE_PADDING: usize = 7;

pub const NO_PROCESS_TEXT: &str = "No processes running";
pub const INVALID_STATE_TEXT: &str = "Invalid state";

/// Persistent state for the process panel.
pub struct ProcessPanelState {
    pub viewport: Viewport,
    /// Including borders
    width: u16,
    height: u16,
    /// Process count seen at the last sync, used by navigation between frames.
    count: usize,
    pub focused: bool,
}

impl Default for ProcessPanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessPanelState {
    pub fn new() -> Self {
        Self::with_dimensions(MIN_WIDTH, MIN_HEIGHT)
    }

    pub fn with_dimensions(width: u16, height: u16) -> Self {
        let mut state = Self {
            viewport: Viewport::default(),
            width: MIN_WIDTH,
            height: MIN_HEIGHT,
            count: 0,
            focused: true,
        };
        state.set_dimensions(width, height);
        state
    }

    pub fn set_dimensions(&mut self, width: u16, height: u16) {
        if width < MIN_WIDTH {
            warn!("Invalid width {}, using minimum {}", width, MIN_WIDTH);
        }
        if height < MIN_HEIGHT {
            warn!("Invalid height {}, using minimum {}", height, MIN_HEIGHT);
        }
        self.width = width.max(MIN_WIDTH);
        self.height = height.max(MIN_HEIGHT);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn view_height(&self) -> usize {
        (self.height - BORDER_SIZE) as usize
    }

    pub fn view_width(&self) -> usize {
        (self.width - BORDER_SIZE) as usize
    }

    /// How many processes fit in the panel.
    pub fn visible(&self) -> usize {
        renderable_count(self.view_height())
    }

    /// Record the current process count, pulling the viewport back in range
    /// if the list or the panel shrank.
    pub fn sync(&mut self, count: usize) {
        self.count = count;
        if count == 0 || self.viewport.cursor >= count || !self.viewport.is_valid(self.visible()) {
            self.viewport.clamp(count, self.visible());
        }
    }

    pub fn list_up(&mut self) {
        self.viewport.list_up(self.count, self.visible());
    }

    pub fn list_down(&mut self) {
        self.viewport.list_down(self.count, self.visible());
    }
}

/// Events emitted by the process panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// The selected row moved to this index of the sorted list.
    SelectionChanged(usize),
}

impl EventHandler for ProcessPanelState {
    type Event = PanelEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PanelEvent> {
        if !self.focused || self.count == 0 {
            return None;
        }
        match event {
            TuiEvent::ListUp => self.list_up(),
            TuiEvent::ListDown => self.list_down(),
            _ => return None,
        }
        Some(PanelEvent::SelectionChanged(self.viewport.cursor))
    }
}

/// Transient render wrapper for the process panel.
pub struct ProcessPanel<'a> {
    state: &'a mut ProcessPanelState,
    registry: &'a Registry,
    icons: IconStyle,
}

impl<'a> ProcessPanel<'a> {
    pub fn new(state: &'a mut ProcessPanelState, registry: &'a Registry, icons: IconStyle) -> Self {
        Self {
            state,
            registry,
            icons,
        }
    }
}

impl Component for ProcessPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.set_dimensions(area.width, area.height);
        let snapshot = self.registry.snapshot();
        self.state.sync(snapshot.len());

        let view = PanelView::window(snapshot, &self.state.viewport, self.state.visible());
        let lines = panel_lines(
            view.as_ref(),
            self.state.view_width(),
            self.state.view_height(),
            self.icons,
        );
        if let Err(e) = &view {
            error!("Process panel in invalid state: {} (height={})", e, self.state.height());
        }

        let border_color = if self.state.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Processes ")
            .title_alignment(Alignment::Left);
        if let Ok(view) = &view
            && view.total > 0
        {
            block = block.title_bottom(Line::from(format!(" {}/{} ", view.cursor + 1, view.total)).right_aligned());
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Build the panel's inner lines from a render query.
pub fn panel_lines(
    view: Result<&PanelView, &ViewportError>,
    view_width: usize,
    view_height: usize,
    icons: IconStyle,
) -> Vec<Line<'static>> {
    let view = match view {
        Ok(view) => view,
        Err(_) => return vec![Line::from(INVALID_STATE_TEXT)],
    };
    if view.total == 0 {
        return vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(" {NO_PROCESS_TEXT}"),
                Style::default().fg(Color::DarkGray),
            )),
        ];
    }

    let mut lines = Vec::new();
    let mut rendered_height = 0;
    for (offset, p) in view.items.iter().enumerate() {
        // A process needs at least its name and progress lines
        if view_height < rendered_height + 2 {
            break;
        }
        rendered_height += 3;

        let marker = cursor_marker(view.is_selected(offset));
        let name = truncate_text(
            &p.display_name(icons),
            view_width.saturating_sub(NAME_TRUNCATE_PADDING),
            "...",
        );
        lines.push(Line::from(vec![
            marker.clone(),
            Span::raw(format!("{name} ")),
            Span::styled(p.state.icon(icons), state_style(p.state)),
        ]));
        lines.push(Line::from(vec![
            marker,
            progress_span(p, view_width.saturating_sub(PROGRESS_BAR_RIGHT_PADDING)),
        ]));
        // Directory-only entries take two rows
        if p.total != 0 {
            lines.push(Line::from(""));
        }
    }
    lines
}

fn cursor_marker(selected: bool) -> Span<'static> {
    let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    if selected {
        Span::styled("┃ ", style)
    } else {
        Span::styled("  ", style)
    }
}

fn state_style(state: ProcessState) -> Style {
    match state {
        ProcessState::InOperation => Style::default().fg(Color::Cyan),
        ProcessState::Successful => Style::default().fg(Color::Green),
        ProcessState::Cancelled => Style::default().fg(Color::Yellow),
        ProcessState::Failed => Style::default().fg(Color::Red),
    }
}

/// Progress bar of `width` columns, percentage included.
fn progress_span(p: &Process, width: usize) -> Span<'static> {
    let ratio = p.completion();
    let percent = format!(" {:>3}%", (ratio * 100.0).round() as u32);
    let bar_width = width.saturating_sub(percent.len());
    let filled = ((ratio * bar_width as f64).round() as usize).min(bar_width);
    let bar = format!(
        "{}{}{}",
        "█".repeat(filled),
        "░".repeat(bar_width - filled),
        percent
    );
    Span::styled(bar, state_style(p.state))
}

/// Truncate `s` to at most `max_width` display columns, ending with `tail`.
pub fn truncate_text(s: &str, max_width: usize, tail: &str) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let tail_width = tail.width();
    if max_width <= tail_width {
        return ".".repeat(max_width);
    }
    let budget = max_width - tail_width;
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(tail);
    out
}
