//! # Viewport
//!
//! Cursor and scroll-window bookkeeping over the sorted process list.
//! Everything here is arithmetic on `(cursor, render_index, count, visible)`.
//!
//! Invariant kept by every mutator:
//!
//! ```text
//! render_index <= cursor <= render_index + visible - 1
//! ```

use std::fmt;

use log::debug;

use crate::core::process::Process;

/// One process takes a name line, a progress line and a separator.
pub const LINES_PER_PROCESS: usize = 3;

/// How many processes fit in `height` rows. The last one may skip its separator.
pub fn renderable_count(height: usize) -> usize {
    (height + 1) / LINES_PER_PROCESS
}

#[derive(Debug)]
pub enum ViewportError {
    InvalidState {
        cursor: usize,
        render_index: usize,
        visible: usize,
    },
}

impl fmt::Display for ViewportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewportError::InvalidState {
                cursor,
                render_index,
                visible,
            } => write!(
                f,
                "invalid viewport state (cursor={cursor}, render_index={render_index}, visible={visible})"
            ),
        }
    }
}

impl std::error::Error for ViewportError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub cursor: usize,
    pub render_index: usize,
}

impl Viewport {
    pub fn new(cursor: usize, render_index: usize) -> Self {
        Self {
            cursor,
            render_index,
        }
    }

    pub fn is_valid(&self, visible: usize) -> bool {
        visible > 0
            && self.render_index <= self.cursor
            && self.cursor < self.render_index + visible
    }

    pub fn validate(&self, visible: usize) -> Result<(), ViewportError> {
        if self.is_valid(visible) {
            Ok(())
        } else {
            Err(ViewportError::InvalidState {
                cursor: self.cursor,
                render_index: self.render_index,
                visible,
            })
        }
    }

    /// Move the cursor up, wrapping from the top to the last item.
    pub fn list_up(&mut self, count: usize, visible: usize) {
        debug!("Viewport::list_up(count={}, visible={})", count, visible);
        if count == 0 {
            return;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            if self.cursor < self.render_index {
                self.render_index -= 1;
            }
        } else {
            self.cursor = count - 1;
            // Either start from the top or from where the last item is still visible
            self.render_index = count.saturating_sub(visible.max(1));
        }
    }

    /// Move the cursor down, wrapping from the last item to the top.
    pub fn list_down(&mut self, count: usize, visible: usize) {
        debug!("Viewport::list_down(count={}, visible={})", count, visible);
        if count == 0 {
            return;
        }
        if self.cursor + 1 < count {
            self.cursor += 1;
            if self.cursor >= self.render_index + visible.max(1) {
                self.render_index += 1;
            }
        } else {
            self.cursor = 0;
            self.render_index = 0;
        }
    }

    /// Pull the window back into shape after the list shrank or the panel
    /// got shorter.
    pub fn clamp(&mut self, count: usize, visible: usize) {
        let visible = visible.max(1);
        if count == 0 {
            *self = Self::default();
            return;
        }
        self.cursor = self.cursor.min(count - 1);
        self.render_index = self.render_index.min(count.saturating_sub(visible));
        if self.cursor < self.render_index {
            self.render_index = self.cursor;
        }
        if self.cursor >= self.render_index + visible {
            self.render_index = self.cursor + 1 - visible;
        }
    }
}

/// Read-only result of a render query: the visible slice of the sorted list.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    /// Visible processes, starting at `first_index` in the sorted order.
    pub items: Vec<Process>,
    pub first_index: usize,
    pub cursor: usize,
    /// Total number of processes, visible or not.
    pub total: usize,
}

impl PanelView {
    pub fn window(
        sorted: Vec<Process>,
        viewport: &Viewport,
        visible: usize,
    ) -> Result<Self, ViewportError> {
        viewport.validate(visible)?;
        let total = sorted.len();
        let items = sorted
            .into_iter()
            .skip(viewport.render_index)
            .take(visible)
            .collect();
        Ok(Self {
            items,
            first_index: viewport.render_index,
            cursor: viewport.cursor,
            total,
        })
    }

    pub fn is_selected(&self, offset: usize) -> bool {
        self.first_index + offset == self.cursor
    }
}
