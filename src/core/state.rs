//! # Widget State
//!
//! Core business state for the chat widget. This module holds domain data
//! only. Presentation concerns (scroll offsets, cursor position, hit
//! rects) live in the `tui` module and never leak in here.
//!
//! ```text
//! ChatWidget
//! ├── transcript: Vec<Message>   // append-only conversation history
//! ├── is_open: bool              // panel visible vs. collapsed launcher
//! └── is_loading: bool           // a query is in flight
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

/// Who a transcript entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// A single chat bubble. Entries are never edited after they are
/// appended, which is what lets the renderer cache their layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

/// The whole chat widget, independent of any terminal.
pub struct ChatWidget {
    /// Conversation history, oldest first. Always starts with the greeting.
    pub transcript: Vec<Message>,
    /// Whether the conversation panel is showing. When false only the
    /// launcher button is visible.
    pub is_open: bool,
    /// True from submit until the bot reply (or a fallback) lands.
    pub is_loading: bool,
}

impl ChatWidget {
    /// Creates a closed, idle widget. The greeting lands as the first bot
    /// message so it renders and scrolls like any other transcript entry.
    pub fn new(greeting: &str) -> Self {
        Self {
            transcript: vec![Message::bot(greeting)],
            is_open: false,
            is_loading: false,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(Message::user(content));
    }

    pub fn push_bot(&mut self, content: impl Into<String>) {
        self.transcript.push(Message::bot(content));
    }
}
