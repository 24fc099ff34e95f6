//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `Launcher`: Floating button that opens the chat panel
//! - `MessageBubble`: Individual conversation message rendering
//! - `TypingIndicator`: Animated dots shown while a reply is pending
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Multi-line text input field
//! - `MessageList`: Scrollable conversation view with layout caching
//!
//! ## Design Philosophy
//!
//! ### Composition Over Inheritance
//!
//! Components compose naturally. For example, `MessageList` renders multiple
//! `MessageBubble` components. This mirrors React's component model.
//!
//! ### Co-location of Concerns
//!
//! Each component file contains everything related to that component:
//! - State types
//! - Event types
//! - Rendering logic
//! - Event handling
//! - Tests
//!
//! **Why:** Makes components self-contained and easy to understand. You can
//! read one file to understand how a component works, rather than jumping
//! between multiple files.
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as "props" (function parameters), not by
//! directly accessing global state. This makes dependencies explicit and
//! components testable.
//!
//! **Example:**
//! ```rust,ignore
//! // Good: Dependencies are explicit
//! MessageList::new(&mut tui.message_list, &widget.transcript, widget.is_loading, frame_no);
//!
//! // Bad: Hidden dependency on global state
//! message_list.render(frame, area); // reads from a global
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── launcher.rs      (Floating open-chat button)
//! ├── message.rs       (Single bubble renderer)
//! ├── message_list.rs  (Scrollable bubble container)
//! └── input_box/       (Multi-line text input)
//! ```

pub mod input_box;
pub mod launcher;
pub mod message;
pub mod message_list;

pub use input_box::{InputBox, InputEvent};
pub use launcher::Launcher;
pub use message::MessageBubble;
pub use message_list::{MessageList, MessageListState};
