//! Top-level frame composition.
//!
//! Draws the dimmed backdrop with a key hint bar, then either the floating
//! launcher button (panel closed) or the chat panel (panel open). Hit zones
//! for the mouse are written back into `TuiState` every frame so the event
//! loop can match click coordinates against what is actually on screen.

use crate::core::state::ChatWidget;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::launcher::{LAUNCHER_HEIGHT, LAUNCHER_LABEL, LAUNCHER_WIDTH};
use crate::tui::components::{Launcher, MessageList};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

pub use crate::tui::components::launcher::OPEN_CHATBOT_LABEL;

/// Title shown in the panel's top border.
pub const PANEL_TITLE: &str = "🤖 AI Assistant";
/// Accessible names for the panel actions, used in the key hint bar.
pub const CLOSE_CHATBOT_LABEL: &str = "Close chatbot";
pub const SEND_MESSAGE_LABEL: &str = "Send message";

/// Close glyph drawn in the panel's top-right corner.
const CLOSE_GLYPH: &str = "✕";
/// Text on the send button.
const SEND_BUTTON_LABEL: &str = "Send ➤";

/// Preferred outer panel size. The panel shrinks to the terminal when the
/// terminal is smaller.
pub const PANEL_WIDTH: u16 = 46;
pub const PANEL_HEIGHT: u16 = 22;
/// Gap kept between the panel (or launcher) and the screen edge.
const CORNER_MARGIN: u16 = 1;
/// Width of the send button column, borders included.
const SEND_BUTTON_WIDTH: u16 = 10;

/// Draw one frame.
pub fn draw_ui(frame: &mut Frame, widget: &ChatWidget, tui: &mut TuiState, spinner_frame: usize) {
    let area = frame.area();
    draw_backdrop(frame, area, widget.is_open);

    if !widget.is_open {
        let rect = launcher_rect(area);
        Launcher.render(frame, rect);
        tui.launcher_area = Some(rect);
        tui.close_area = None;
        tui.send_area = None;
        return;
    }

    let panel = panel_rect(area);
    frame.render_widget(Clear, panel);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(
            Line::from(PANEL_TITLE)
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .title_top(
            Line::from(CLOSE_GLYPH)
                .style(Style::default().fg(Color::Cyan))
                .right_aligned(),
        );
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    use Constraint::{Length, Min};
    let input_height = tui
        .input_box
        .calculate_height(inner.width.saturating_sub(SEND_BUTTON_WIDTH));
    let [transcript_area, input_row] =
        Layout::vertical([Min(0), Length(input_height)]).areas(inner);
    let [input_area, button_area] =
        Layout::horizontal([Min(0), Length(SEND_BUTTON_WIDTH)]).areas(input_row);

    let mut list = MessageList::new(
        &mut tui.message_list,
        &widget.transcript,
        widget.is_loading,
        spinner_frame,
    );
    list.render(frame, transcript_area);

    tui.input_box.render(frame, input_area);
    draw_send_button(frame, button_area, widget.is_loading);

    tui.launcher_area = None;
    // The glyph itself is one cell; give the click zone a little slack
    tui.close_area = Some(Rect::new(
        panel.x + panel.width.saturating_sub(4),
        panel.y,
        3,
        1,
    ));
    tui.send_area = Some(button_area);
}

/// Version banner in the middle of the screen plus a key hint bar at the
/// bottom. Everything is dim so the launcher and panel stand out.
fn draw_backdrop(frame: &mut Frame, area: Rect, is_open: bool) {
    if area.height == 0 {
        return;
    }

    let banner = Line::from(format!(
        "{} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ))
    .style(Style::default().add_modifier(Modifier::DIM))
    .centered();
    let banner_area = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(banner, banner_area);

    let hint = if is_open {
        format!(
            "{CLOSE_CHATBOT_LABEL}: Esc · {SEND_MESSAGE_LABEL}: Enter · Shift+Enter inserts a new line"
        )
    } else {
        format!("{OPEN_CHATBOT_LABEL}: click {LAUNCHER_LABEL} or press Enter · Ctrl+C quits")
    };
    let hint_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    frame.render_widget(
        Line::from(hint)
            .style(Style::default().add_modifier(Modifier::DIM))
            .centered(),
        hint_area,
    );
}

fn draw_send_button(frame: &mut Frame, area: Rect, is_loading: bool) {
    let style = if is_loading {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::Cyan)
    };

    // Keep the button three rows tall, vertically centered in its column
    let height = 3.min(area.height);
    let button = Rect {
        y: area.y + area.height.saturating_sub(height) / 2,
        height,
        ..area
    };

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(style);
    let inner = block.inner(button);
    frame.render_widget(block, button);
    frame.render_widget(
        Paragraph::new(Line::from(SEND_BUTTON_LABEL).style(style).centered()),
        inner,
    );
}

/// Where the launcher button sits: bottom-right corner with a margin.
pub fn launcher_rect(area: Rect) -> Rect {
    let width = LAUNCHER_WIDTH.min(area.width);
    let height = LAUNCHER_HEIGHT.min(area.height);
    Rect::new(
        area.x + area.width.saturating_sub(width + CORNER_MARGIN),
        area.y + area.height.saturating_sub(height + CORNER_MARGIN),
        width,
        height,
    )
}

/// Where the panel sits: anchored to the bottom-right corner, shrunk to fit
/// small terminals.
pub fn panel_rect(area: Rect) -> Rect {
    let width = PANEL_WIDTH.min(area.width);
    let height = PANEL_HEIGHT.min(area.height);
    Rect::new(
        area.x + area.width.saturating_sub(width + CORNER_MARGIN),
        area.y + area.height.saturating_sub(height + CORNER_MARGIN),
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_launcher_rect_bottom_right() {
        let rect = launcher_rect(Rect::new(0, 0, 80, 24));
        assert_eq!(rect, Rect::new(65, 20, LAUNCHER_WIDTH, LAUNCHER_HEIGHT));
    }

    #[test]
    fn test_panel_rect_bottom_right() {
        let rect = panel_rect(Rect::new(0, 0, 80, 24));
        assert_eq!(rect, Rect::new(33, 1, PANEL_WIDTH, PANEL_HEIGHT));
    }

    #[test]
    fn test_panel_rect_fills_small_terminal() {
        let rect = panel_rect(Rect::new(0, 0, 30, 10));
        assert_eq!(rect, Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn test_draw_ui_closed_shows_launcher() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let widget = ChatWidget::new("Hello!");
        let mut tui = TuiState::new();

        terminal
            .draw(|f| {
                draw_ui(f, &widget, &mut tui, 0);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("💬"));
        assert!(text.contains("Chat"));
        assert!(text.contains(OPEN_CHATBOT_LABEL));
        assert!(!text.contains(PANEL_TITLE));

        assert_eq!(tui.launcher_area, Some(launcher_rect(Rect::new(0, 0, 80, 24))));
        assert_eq!(tui.close_area, None);
        assert_eq!(tui.send_area, None);
    }

    #[test]
    fn test_draw_ui_open_shows_panel() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut widget = ChatWidget::new("Hello there");
        widget.is_open = true;
        let mut tui = TuiState::new();

        terminal
            .draw(|f| {
                draw_ui(f, &widget, &mut tui, 0);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("AI Assistant"));
        assert!(text.contains(CLOSE_GLYPH));
        assert!(text.contains("Send"));
        assert!(text.contains("Hello there"), "greeting bubble should render");
        assert!(text.contains("Type your message..."));

        assert_eq!(tui.launcher_area, None);
        assert!(tui.close_area.is_some());
        assert!(tui.send_area.is_some());
    }

    #[test]
    fn test_close_area_sits_on_top_border() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut widget = ChatWidget::new("Hi");
        widget.is_open = true;
        let mut tui = TuiState::new();

        terminal
            .draw(|f| {
                draw_ui(f, &widget, &mut tui, 0);
            })
            .unwrap();

        let panel = panel_rect(Rect::new(0, 0, 80, 24));
        let close = tui.close_area.unwrap();
        assert_eq!(close.y, panel.y);
        assert!(close.x > panel.x + panel.width / 2, "close zone is right of center");
        assert!(close.x + close.width <= panel.x + panel.width);
    }
}
