//! # Launcher Component
//!
//! Floating button shown in the bottom-right corner while the chat panel
//! is closed. Clicking it (or pressing Enter) opens the panel.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! The launcher is purely presentational. Whether it is shown at all is
//! decided by the caller from `ChatWidget::is_open`, and its screen
//! position is computed by the layout code. The component itself just
//! draws a button.
//!
//! ### Hit Testing Lives Elsewhere
//!
//! The launcher doesn't handle clicks. The event loop records the Rect it
//! was drawn into and matches mouse coordinates against that. Keeping hit
//! testing out of the component means it needs no state and no event
//! plumbing.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

/// Text on the launcher button.
pub const LAUNCHER_LABEL: &str = "💬 Chat";
/// Accessible name for the launcher action, used in the key hint bar.
pub const OPEN_CHATBOT_LABEL: &str = "Open chatbot";

/// Outer size of the launcher button, borders included.
pub const LAUNCHER_WIDTH: u16 = 14;
pub const LAUNCHER_HEIGHT: u16 = 3;

/// Floating open-chat button.
pub struct Launcher;

impl Component for Launcher {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = Line::from(LAUNCHER_LABEL)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .centered();
        frame.render_widget(Paragraph::new(label), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_launcher_renders_label() {
        let backend = TestBackend::new(LAUNCHER_WIDTH, LAUNCHER_HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| {
                Launcher.render(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();

        assert!(text.contains("💬"));
        assert!(text.contains("Chat"));
    }

    #[test]
    fn test_launcher_label_fits_declared_size() {
        use unicode_width::UnicodeWidthStr;

        // Label + borders + one cell of breathing room per side
        assert!(LAUNCHER_LABEL.width() as u16 + 2 <= LAUNCHER_WIDTH);
        assert!(LAUNCHER_HEIGHT >= 3);
    }
}
