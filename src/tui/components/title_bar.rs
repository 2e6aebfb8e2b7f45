//! # TitleBar Component
//!
//! Top status bar: process counts and the latest status message.
//!
//! Stateless: everything it shows arrives as props.
//!
//! 1. **Status message**: `"procbar | 2 running / 5 tracked | Started copy"`
//! 2. **Default**: `"procbar | 2 running / 5 tracked"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct TitleBar {
    pub running: usize,
    pub tracked: usize,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(running: usize, tracked: usize, status_message: String) -> Self {
        Self {
            running,
            tracked,
            status_message,
        }
    }

    pub fn text(&self) -> String {
        let counts = format!(
            "procbar | {} running / {} tracked",
            self.running, self.tracked
        );
        if self.status_message.is_empty() {
            counts
        } else {
            format!("{counts} | {}", self.status_message)
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_title_bar_with_status_message() {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut title_bar = TitleBar::new(2, 5, "Started copy".to_string());

        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();

        assert!(text.contains("2 running / 5 tracked"));
        assert!(text.contains("Started copy"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let title_bar = TitleBar::new(0, 0, String::new());
        assert_eq!(title_bar.text(), "procbar | 0 running / 0 tracked");
    }
}
