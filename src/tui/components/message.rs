use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::state::{Message, Role};
use crate::tui::component::Component;
use crate::tui::format;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
pub const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub const VERTICAL_OVERHEAD: u16 = 2;
/// Narrowest bubble that still fits its role title on the border.
const MIN_BUBBLE_WIDTH: u16 = 12;

const USER_COLOR: Color = Color::Cyan;
const BOT_COLOR: Color = Color::Green;

/// A stateless component that renders a single transcript entry as a
/// chat bubble.
///
/// # Design
///
/// `MessageBubble` is a **transient component**: it's created fresh each
/// frame around a borrow of the transcript entry it renders. It holds no
/// mutable state.
///
/// # Alignment
///
/// The area handed in by the parent `MessageList` spans the full content
/// width; the bubble draws itself narrower inside it. User bubbles hug
/// the right edge, bot bubbles the left, so the transcript reads as a
/// two-party conversation. A bubble grows with its content up to 80% of
/// the available width, then wraps.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts rendered height
/// by asking the same `Paragraph` the render pass draws, via
/// `line_count`. Bold markup is consumed by the formatter before
/// wrapping, so prediction and render cannot disagree about where a line
/// breaks. This lets `MessageList` lay out scroll positions without
/// rendering anything.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// The width this bubble will occupy inside `total_width` columns:
    /// its content width plus chrome, clamped to 80% of the row.
    pub fn bubble_width(message: &Message, total_width: u16) -> u16 {
        let cap = total_width.saturating_sub(total_width / 5).max(1);
        let natural = content_width(message).saturating_add(HORIZONTAL_OVERHEAD);
        natural.clamp(MIN_BUBBLE_WIDTH.min(cap), cap)
    }

    /// Calculate the height required for this message given the full row
    /// width. Must stay in lockstep with `render`, which is why both go
    /// through [`rendered_paragraph`].
    pub fn calculate_height(message: &Message, total_width: u16) -> u16 {
        let width = Self::bubble_width(message, total_width);
        let wrap_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if wrap_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            // Return 1 row so the message still occupies space.
            return 1;
        }

        let paragraph = rendered_paragraph(message);
        (paragraph.line_count(wrap_width) as u16).max(1) + VERTICAL_OVERHEAD
    }
}

/// Widget implementation so bubbles can render into a ScrollView buffer.
impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let (role, color) = match self.message.role {
            Role::User => ("you", USER_COLOR),
            Role::Bot => ("assistant", BOT_COLOR),
        };

        let width = Self::bubble_width(self.message, area.width);
        let x = match self.message.role {
            Role::User => area.x + area.width.saturating_sub(width),
            Role::Bot => area.x,
        };
        let bubble_area = Rect::new(x, area.y, width, area.height);

        let border_style = Style::default().fg(color).add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .title(role)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(Style::default().fg(color))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(bubble_area);
        block.render(bubble_area, buf);

        rendered_paragraph(self.message).render(inner_area, buf);
    }
}

/// Component trait implementation.
///
/// `MessageBubble` is stateless, so the `&mut self` required by the
/// trait is a no-op; rendering is delegated to the [`Widget`] impl.
impl<'a> Component for MessageBubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

/// Builds the exact paragraph the bubble draws. Bot replies go through
/// the formatter (bold, links); user text renders literally, markup and
/// all.
fn rendered_paragraph(message: &Message) -> Paragraph<'static> {
    match message.role {
        Role::Bot => {
            Paragraph::new(format::render(&message.content, BOT_COLOR)).wrap(Wrap { trim: true })
        }
        Role::User => Paragraph::new(Text::from(message.content.clone()))
            .style(Style::default().fg(USER_COLOR))
            .wrap(Wrap { trim: true }),
    }
}

/// Widest display line of the message, emoji-safe. For bot replies this
/// measures the formatted text, after bold markup is consumed.
fn content_width(message: &Message) -> u16 {
    match message.role {
        Role::Bot => format::render(&message.content, BOT_COLOR)
            .lines
            .iter()
            .map(|line| line.width())
            .max()
            .unwrap_or(0) as u16,
        Role::User => message
            .content
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let cells: Vec<&str> = buffer.content().iter().map(|c| c.symbol()).collect();
        cells.chunks(width).map(|row| row.concat()).collect()
    }

    // ==========================================================================
    // Width and height tests
    // ==========================================================================

    #[test]
    fn bubble_width_grows_with_content() {
        let short = Message::user("hi");
        let longer = Message::user("hello over there");
        assert_eq!(MessageBubble::bubble_width(&short, 80), MIN_BUBBLE_WIDTH);
        assert_eq!(
            MessageBubble::bubble_width(&longer, 80),
            16 + HORIZONTAL_OVERHEAD
        );
    }

    #[test]
    fn bubble_width_caps_at_four_fifths_of_row() {
        let message = Message::user("x".repeat(100));
        assert_eq!(MessageBubble::bubble_width(&message, 50), 40);
    }

    #[test]
    fn bubble_width_measures_consumed_bold_markup() {
        // 36 content chars + 4 asterisks; formatted width is 36, so the
        // bubble fits a 40-column cap without wrapping.
        let content = format!("**{}**", "a".repeat(36));
        let message = Message::bot(content);
        assert_eq!(MessageBubble::bubble_width(&message, 50), 40);
        assert_eq!(
            MessageBubble::calculate_height(&message, 50),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_single_line() {
        let message = Message::user("hello");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_long_content() {
        // 60 chars, row of 50 → cap 40, wrap width 36 → 2 lines
        let message = Message::user("a".repeat(60));
        assert_eq!(
            MessageBubble::calculate_height(&message, 50),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_counts_newlines() {
        let message = Message::bot("one\ntwo\nthree");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_degenerate_width() {
        let message = Message::user("hello");
        assert_eq!(MessageBubble::calculate_height(&message, 0), 1);
    }

    // ==========================================================================
    // Alignment tests
    // ==========================================================================

    #[test]
    fn user_bubble_hugs_right_edge() {
        let message = Message::user("hi");
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|f| {
                let mut bubble = MessageBubble::new(&message);
                bubble.render(f, f.area());
            })
            .unwrap();

        let rows = buffer_rows(&terminal);
        // Bubble is MIN_BUBBLE_WIDTH wide, so columns 0..28 stay blank
        assert_eq!(rows[0][..28].trim(), "");
        assert!(rows[0].contains("you"));
        assert!(rows[1].contains("hi"));
    }

    #[test]
    fn bot_bubble_hugs_left_edge() {
        let message = Message::bot("hello");
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|f| {
                let mut bubble = MessageBubble::new(&message);
                bubble.render(f, f.area());
            })
            .unwrap();

        let rows = buffer_rows(&terminal);
        assert!(rows[0].starts_with('╭'));
        assert!(rows[0].contains("assistant"));
        assert!(rows[1].contains("hello"));
    }

    #[test]
    fn bot_bubble_renders_markup_inert() {
        let message = Message::bot("<b>hi</b>");
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|f| {
                let mut bubble = MessageBubble::new(&message);
                bubble.render(f, f.area());
            })
            .unwrap();

        let rows = buffer_rows(&terminal);
        assert!(rows[1].contains("<b>hi</b>"));
    }
}
