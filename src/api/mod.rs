pub mod client;
pub mod csrf;
pub mod provider;
pub mod types;

pub use client::ChatbotClient;
pub use provider::{ApiError, QueryProvider, resolve_reply};
pub use types::{QueryRequest, classify_payload, reply_for_error};
