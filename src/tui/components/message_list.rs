//! # MessageList Component
//!
//! Scrollable view of the conversation transcript.
//!
//! ## Responsibilities
//!
//! - Display the transcript as aligned chat bubbles
//! - Manage scrolling specific logic (stick-to-bottom, clamping)
//! - Show the typing indicator while a query is in flight
//! - Perform efficient layout caching (bubble heights)
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript
//! (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the
//! state (including layout cache and scroll state) during the render
//! pass, aligning with Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Widget};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;

/// Height of the typing indicator bubble, borders included.
pub const TYPING_HEIGHT: u16 = 3;
/// Dots in the typing indicator.
const TYPING_DOTS: usize = 3;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    /// Prevents overscrolling past the last bubble.
    pub fn clamp_scroll(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the
    /// bottom. Called on scroll-down events so that scrolling past the
    /// end re-pins to bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable transcript view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    // Mutable reference to persistent state
    pub state: &'a mut MessageListState,
    pub transcript: &'a [Message],
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a [Message],
        is_loading: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            is_loading,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_messages = self.transcript.len();

        // 1. Update layout cache. Transcript entries are append-only and
        // never edited, so cached heights survive anything except a width
        // change.
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(num_messages, content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));
        for message in self.transcript.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(MessageBubble::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(num_messages, content_width);

        let total_height: u16 = self.state.layout.heights.iter().sum();

        // While loading, the typing bubble borrows canvas space after the
        // last message so scroll_to_bottom keeps it on screen.
        let canvas_height = if self.is_loading {
            total_height + TYPING_HEIGHT
        } else {
            total_height
        };

        // 2. Clamp scroll offset to prevent overscrolling past content.
        // Skip when auto-scrolling: scroll_to_bottom targets the canvas,
        // which may include the typing bubble.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible bubbles into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let bubble = MessageBubble::new(&self.transcript[i]);
            scroll_view.render_widget(bubble, Rect::new(0, y_offset, content_width, height));
            y_offset += height;
        }

        if self.is_loading {
            let indicator = TypingIndicator {
                spinner_frame: self.spinner_frame,
            };
            scroll_view.render_widget(
                indicator,
                Rect::new(0, total_height, content_width, TYPING_HEIGHT),
            );
        }

        // Auto-scroll logic (mutation)
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        // Render the ScrollView into the full viewport area
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler is implemented on `MessageListState` rather than
/// `MessageList` because:
/// 1. Event handling requires persistent state (scroll position, the
///    stick_to_bottom flag)
/// 2. `MessageList` is recreated each frame with fresh props, so it can't
///    hold state
/// 3. The state object lives in `TuiState` and persists across the event
///    loop
impl EventHandler for MessageListState {
    type Event = (); // MessageList emits no events (scroll handled internally)

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Animated three-dot bubble shown on the bot side while a reply is
/// pending. Shaped like a small message bubble so the transcript scrolls
/// it naturally, but derived from `is_loading` and never stored.
pub struct TypingIndicator {
    pub spinner_frame: usize,
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let lit = self.spinner_frame % TYPING_DOTS + 1;
        let mut dots = String::new();
        for i in 0..TYPING_DOTS {
            if i > 0 {
                dots.push(' ');
            }
            dots.push(if i < lit { '●' } else { '·' });
        }

        let width = (TYPING_DOTS as u16 * 2 - 1) + super::message::HORIZONTAL_OVERHEAD;
        let bubble_area = Rect::new(area.x, area.y, width.min(area.width), area.height);

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(Style::default().fg(Color::Green).add_modifier(Modifier::DIM));
        let inner = block.inner(bubble_area);
        block.render(bubble_area, buf);

        Paragraph::new(dots)
            .style(Style::default().fg(Color::Green))
            .render(inner, buf);
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid. Bubbles never change
    /// after append, so the answer is "all of them" unless the width
    /// changed or the transcript shrank (which means it was replaced).
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if message_count < self.message_count {
            return 0;
        }
        self.heights.len()
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    /// Indices of bubbles worth rendering for the given scroll window,
    /// padded by half a viewport on each side.
    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
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
    fn test_layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 5]; // Simulating 5 bubbles of height 3
        cache.update_metadata(5, 80);

        // Case 1: Same everything -> all reusable
        assert_eq!(cache.reusable_count(5, 80), 5);

        // Case 2: New message appended -> old heights still valid
        assert_eq!(cache.reusable_count(6, 80), 5);

        // Case 3: Width changed -> nothing reusable
        assert_eq!(cache.reusable_count(5, 40), 0);

        // Case 4: Transcript shrank (replaced) -> nothing reusable
        assert_eq!(cache.reusable_count(2, 80), 0);
    }

    #[test]
    fn test_visible_range_brackets_viewport() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 3, 3, 3, 3, 3, 3, 3];
        cache.rebuild_prefix_heights();

        // Viewport 6 rows at offset 0, buffer 3: rows 0..9 -> bubbles 0..3
        let range = cache.visible_range(0, 6);
        assert_eq!(range.start, 0);
        assert!(range.end >= 3 && range.end <= 5);

        // Deep scroll excludes the first bubbles entirely
        let range = cache.visible_range(18, 6);
        assert!(range.start >= 4);
        assert_eq!(range.end, 8);
    }

    #[test]
    fn test_scroll_up_unpins_scroll_down_repins() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![3; 10];
        state.layout.rebuild_prefix_heights();
        state.viewport_height = 9;
        assert!(state.stick_to_bottom);

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);

        // Scrolling down from offset 0 lands well short of the bottom
        state.scroll_state.set_offset(Position { x: 0, y: 0 });
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(!state.stick_to_bottom);

        // At the bottom edge, scrolling down re-pins
        state.scroll_state.set_offset(Position { x: 0, y: 21 });
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_clamp_scroll_limits_offset() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![3; 4]; // 12 rows of content
        state.viewport_height = 9;
        state.scroll_state.set_offset(Position { x: 0, y: 50 });

        state.clamp_scroll();
        assert_eq!(state.scroll_state.offset().y, 3);
    }

    #[test]
    fn test_render_shows_transcript_and_typing_indicator() {
        let transcript = vec![Message::bot("Hello!"), Message::user("hi")];
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();

        terminal
            .draw(|f| {
                let mut list = MessageList::new(&mut state, &transcript, true, 0);
                list.render(f, f.area());
            })
            .unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Hello!"));
        assert!(content.contains("hi"));
        assert!(content.contains('●'), "typing indicator should be visible");
    }

    #[test]
    fn test_typing_indicator_absent_when_idle() {
        let transcript = vec![Message::bot("Hello!")];
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();

        terminal
            .draw(|f| {
                let mut list = MessageList::new(&mut state, &transcript, false, 0);
                list.render(f, f.area());
            })
            .unwrap();

        assert!(!buffer_text(&terminal).contains('●'));
    }

    #[test]
    fn test_typing_indicator_cycles_dots() {
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    TypingIndicator { spinner_frame: 0 },
                    Rect::new(0, 0, 20, TYPING_HEIGHT),
                );
            })
            .unwrap();
        let first = buffer_text(&terminal);
        assert_eq!(first.matches('●').count(), 1);

        terminal
            .draw(|f| {
                f.render_widget(
                    TypingIndicator { spinner_frame: 2 },
                    Rect::new(0, 0, 20, TYPING_HEIGHT),
                );
            })
            .unwrap();
        let third = buffer_text(&terminal);
        assert_eq!(third.matches('●').count(), 3);
    }
}
