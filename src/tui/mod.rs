//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! The intention is to swap this out for a different adapter in the future
//! if needed.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (typing indicator while a query is in flight): draws
//!   every ~80ms for smooth animation.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal
//!   resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous
//! redraws.

mod component;
mod components;
mod event;
pub mod format;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::{Position, Rect};

use crate::api::{ChatbotClient, QueryProvider, resolve_reply};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::ChatWidget;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    // Mouse hit zones recorded by the last draw (None = not on screen)
    pub launcher_area: Option<Rect>,
    pub close_area: Option<Rect>,
    pub send_area: Option<Rect>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            launcher_area: None,
            close_area: None,
            send_area: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable Kitty keyboard protocol unconditionally (allows Shift+Enter detection)
        // Detection via supports_keyboard_enhancement() fails in WSL, but the protocol
        // is harmlessly ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider: Arc<dyn QueryProvider> =
        Arc::new(ChatbotClient::from_config(&config).map_err(std::io::Error::other)?);
    let mut widget = ChatWidget::new(&config.greeting);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for bot replies from background tasks
    let (tx, rx) = mpsc::channel();

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Sync InputBox props with widget state
        tui.input_box.disabled = widget.is_loading;

        // The typing indicator animates while a query is in flight
        let animating = widget.is_loading;
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 6.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &widget, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating, long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // ForceQuit (Ctrl+C) always quits
            if matches!(event, TuiEvent::ForceQuit) {
                if update(&mut widget, Action::Quit) == Effect::Quit {
                    should_quit = true;
                }
                continue;
            }

            // Esc closes the panel. Pending replies keep arriving while it
            // is closed and are waiting in the transcript on reopen.
            if matches!(event, TuiEvent::Escape) {
                update(&mut widget, Action::Close);
                continue;
            }

            // Mouse clicks hit-test against the zones recorded by the last draw
            if let TuiEvent::MouseClick(col, row) = event {
                let pos = Position { x: col, y: row };
                if !widget.is_open {
                    if tui.launcher_area.is_some_and(|r| r.contains(pos)) {
                        update(&mut widget, Action::Open);
                        tui.message_list.stick_to_bottom = true;
                    }
                } else if tui.close_area.is_some_and(|r| r.contains(pos)) {
                    update(&mut widget, Action::Close);
                } else if tui.send_area.is_some_and(|r| r.contains(pos))
                    && !widget.is_loading
                    && let Some(InputEvent::Submit(text)) =
                        tui.input_box.handle_event(&TuiEvent::Submit)
                    && let Effect::SpawnRequest(query) = update(&mut widget, Action::Submit(text))
                {
                    spawn_request(provider.clone(), query, tx.clone());
                    tui.message_list.stick_to_bottom = true;
                }
                continue;
            }

            // Scroll events go to the transcript while the panel is open
            if matches!(
                event,
                TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown
            ) {
                if widget.is_open {
                    tui.message_list.handle_event(&event);
                }
                continue;
            }

            // Everything else edits the input box
            if !widget.is_open {
                // Enter opens the panel from the keyboard
                if matches!(event, TuiEvent::Submit) {
                    update(&mut widget, Action::Open);
                    tui.message_list.stick_to_bottom = true;
                }
                continue;
            }
            if widget.is_loading {
                // Input is disabled while a query is in flight
                continue;
            }
            if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event)
                && let Effect::SpawnRequest(query) = update(&mut widget, Action::Submit(text))
            {
                spawn_request(provider.clone(), query, tx.clone());
                tui.message_list.stick_to_bottom = true;
            }
        }

        if should_quit {
            break;
        }

        // Bot replies arriving from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let is_reply = matches!(action, Action::BotReply(_));
            if update(&mut widget, action) == Effect::Quit {
                should_quit = true;
            }
            if is_reply {
                tui.message_list.stick_to_bottom = true;
            }
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Send the query off the UI thread and deliver the reply as an Action.
/// The reply is always a displayable string (`resolve_reply` maps errors
/// to fallback messages), so the event loop never sees a failure here.
fn spawn_request(provider: Arc<dyn QueryProvider>, query: String, tx: mpsc::Sender<Action>) {
    info!("Spawning chatbot query ({} chars)", query.len());
    tokio::spawn(async move {
        let reply = resolve_reply(provider.as_ref(), &query).await;
        if tx.send(Action::BotReply(reply)).is_err() {
            warn!("Failed to deliver bot reply: receiver dropped");
        }
    });
}
