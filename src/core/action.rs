//! # Actions
//!
//! Everything that can happen to the widget becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The backend answers? That's `Action::BotReply(text)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and hands back an `Effect` for the caller to execute. No
//! I/O here. The event loop owns side effects.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//! ```
//!
//! This makes everything testable: apply an action, assert on the state.
//! And debuggable: log every action, replay the exact session.

use crate::core::state::ChatWidget;

/// State transitions. Raised by the event loop in response to terminal
/// input or by the background task when a reply resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the conversation panel.
    Open,
    /// Hide the panel, back to the launcher. Transcript is kept.
    Close,
    /// Launcher button behavior: open when closed, close when open.
    Toggle,
    /// User submitted the input buffer. Carries the raw draft text.
    Submit(String),
    /// A reply arrived from the background task. Always display text,
    /// whether it came from the backend or from the fallback table.
    BotReply(String),
    /// Tear down the event loop.
    Quit,
}

/// Side effects requested by `update()`. The event loop executes these
/// after applying the state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Fire the query at the backend on a background task.
    SpawnRequest(String),
    Quit,
}

/// The single state-transition function.
///
/// Submit is where the interesting rules live: whitespace-only drafts are
/// rejected before they touch the transcript, and a second submit while a
/// query is in flight is ignored so exactly one request exists at a time.
pub fn update(widget: &mut ChatWidget, action: Action) -> Effect {
    match action {
        Action::Open => {
            widget.is_open = true;
            Effect::None
        }
        Action::Close => {
            widget.is_open = false;
            Effect::None
        }
        Action::Toggle => {
            widget.is_open = !widget.is_open;
            Effect::None
        }
        Action::Submit(draft) => {
            let text = draft.trim();
            if text.is_empty() || widget.is_loading {
                return Effect::None;
            }
            widget.push_user(text);
            widget.is_loading = true;
            Effect::SpawnRequest(text.to_string())
        }
        Action::BotReply(text) => {
            // Valid even while the panel is closed: the in-flight query
            // keeps running when the user collapses the widget, and its
            // reply still lands in the transcript.
            widget.push_bot(text);
            widget.is_loading = false;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Role;

    fn open_widget() -> ChatWidget {
        let mut widget = ChatWidget::new("greeting");
        update(&mut widget, Action::Open);
        widget
    }

    #[test]
    fn test_open_close_toggle() {
        let mut widget = ChatWidget::new("greeting");
        assert_eq!(update(&mut widget, Action::Open), Effect::None);
        assert!(widget.is_open);

        // Open is idempotent
        update(&mut widget, Action::Open);
        assert!(widget.is_open);

        update(&mut widget, Action::Close);
        assert!(!widget.is_open);

        // Close while already closed is a no-op
        update(&mut widget, Action::Close);
        assert!(!widget.is_open);

        update(&mut widget, Action::Toggle);
        assert!(widget.is_open);
        update(&mut widget, Action::Toggle);
        assert!(!widget.is_open);
    }

    #[test]
    fn test_submit_appends_and_spawns() {
        let mut widget = open_widget();
        let effect = update(&mut widget, Action::Submit("hello".to_string()));

        assert_eq!(effect, Effect::SpawnRequest("hello".to_string()));
        assert!(widget.is_loading);
        assert_eq!(widget.transcript.len(), 2);
        assert_eq!(widget.transcript[1].role, Role::User);
        assert_eq!(widget.transcript[1].content, "hello");
    }

    #[test]
    fn test_submit_trims_surrounding_whitespace() {
        let mut widget = open_widget();
        let effect = update(&mut widget, Action::Submit("  hi there \n".to_string()));

        assert_eq!(effect, Effect::SpawnRequest("hi there".to_string()));
        assert_eq!(widget.transcript[1].content, "hi there");
    }

    #[test]
    fn test_submit_whitespace_only_is_rejected() {
        let mut widget = open_widget();
        let effect = update(&mut widget, Action::Submit("   \n\t ".to_string()));

        assert_eq!(effect, Effect::None);
        assert!(!widget.is_loading);
        assert_eq!(widget.transcript.len(), 1);
    }

    #[test]
    fn test_submit_while_loading_is_ignored() {
        let mut widget = open_widget();
        update(&mut widget, Action::Submit("first".to_string()));
        let effect = update(&mut widget, Action::Submit("second".to_string()));

        assert_eq!(effect, Effect::None);
        assert_eq!(widget.transcript.len(), 2); // greeting + first only
        assert!(widget.is_loading);
    }

    #[test]
    fn test_reply_appends_and_clears_loading() {
        let mut widget = open_widget();
        update(&mut widget, Action::Submit("question".to_string()));
        let effect = update(&mut widget, Action::BotReply("answer".to_string()));

        assert_eq!(effect, Effect::None);
        assert!(!widget.is_loading);
        assert_eq!(widget.transcript.last().map(|m| m.role), Some(Role::Bot));
        assert_eq!(widget.transcript.last().map(|m| m.content.as_str()), Some("answer"));
    }

    #[test]
    fn test_reply_lands_while_panel_closed() {
        let mut widget = open_widget();
        update(&mut widget, Action::Submit("question".to_string()));
        update(&mut widget, Action::Close);
        update(&mut widget, Action::BotReply("answer".to_string()));

        assert!(!widget.is_open);
        assert!(!widget.is_loading);
        assert_eq!(widget.transcript.len(), 3);
    }

    #[test]
    fn test_submit_usable_again_after_reply() {
        let mut widget = open_widget();
        update(&mut widget, Action::Submit("one".to_string()));
        update(&mut widget, Action::BotReply("ack".to_string()));
        let effect = update(&mut widget, Action::Submit("two".to_string()));

        assert_eq!(effect, Effect::SpawnRequest("two".to_string()));
        assert_eq!(widget.transcript.len(), 4);
    }

    #[test]
    fn test_quit_requests_teardown() {
        let mut widget = ChatWidget::new("greeting");
        assert_eq!(update(&mut widget, Action::Quit), Effect::Quit);
    }
}
