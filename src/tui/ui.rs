use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::core::registry::Registry;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ProcessPanel, TitleBar};

const HELP_TEXT: &str =
    " c copy  m move  d delete  z zip  x extract  e/u crypt  f failing  ↑↓ select  Tab focus  q quit ";

pub fn draw_ui(frame: &mut Frame, registry: &Registry, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, panel_area, help_area] = layout.areas(frame.area());

    TitleBar::new(
        registry.running_count(),
        registry.len(),
        tui.status_message.clone(),
    )
    .render(frame, title_area);

    ProcessPanel::new(&mut tui.panel, registry, tui.icons).render(frame, panel_area);

    frame.render_widget(
        Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IconStyle;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_draw_ui() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let registry = Registry::default();
        let mut tui = TuiState::new(IconStyle::Plain);
        terminal
            .draw(|f| {
                draw_ui(f, &registry, &mut tui);
            })
            .unwrap();

        // Panel takes everything between the title and help rows
        assert_eq!(tui.panel.height(), 22);
        assert_eq!(tui.panel.width(), 80);
    }
}
