//! Request body and reply classification for the chatbot endpoint.
//!
//! The backend speaks a one-shot JSON protocol: `{"query": ...}` goes
//! out, `{"success": ..., "response": ..., "error": ...}` comes back,
//! with no guarantee any given field is present. Classification turns
//! whatever arrived into exactly one line of display text, so the
//! transcript never shows a raw error.

use serde::Serialize;
use serde_json::Value;

use super::provider::ApiError;

/// Request body for the chatbot endpoint.
#[derive(Serialize, Debug)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

// ============================================================================
// Canned Replies
// ============================================================================

/// The request never reached the backend.
pub const CONNECTION_ERROR_REPLY: &str =
    "Connection error. Please check your internet and try again.";

/// The backend was reachable but answered with a failure status.
pub const SERVICE_ERROR_REPLY: &str =
    "Sorry, there was a problem connecting to our AI. Please try again.";

/// The backend flagged a query it could not handle.
pub const REPHRASE_REPLY: &str = "I'm having trouble understanding. Could you rephrase that?";

/// The payload carried neither an answer nor an error.
pub const GENERIC_REPLY: &str =
    "I'm here to help! Ask me about our products, orders, or anything else.";

/// The deadline expired, or the body was not usable JSON.
pub const UNAVAILABLE_REPLY: &str = "I'm temporarily unavailable. Please try again in a moment.";

// ============================================================================
// Classification
// ============================================================================

/// Loose truthiness for payload flags. Backends disagree on whether
/// `success` is a bool, a number, or a string, so any of `null`, `false`,
/// `0`, and `""` count as unset and everything else counts as set.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Classifies a backend payload into display text.
///
/// The answer is used verbatim only when the payload flags success and
/// carries a non-empty `response` string; that check runs first, so a
/// stray `error` field cannot override a good answer. A flagged error
/// asks the user to rephrase. Anything else gets the generic nudge.
pub fn classify_payload(payload: &Value) -> String {
    let success = payload.get("success").is_some_and(is_set);
    let response = payload
        .get("response")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());

    if success && let Some(text) = response {
        return text.to_string();
    }
    if payload.get("error").is_some_and(is_set) {
        return REPHRASE_REPLY.to_string();
    }
    GENERIC_REPLY.to_string()
}

/// Maps a transport or protocol failure onto its canned reply.
pub fn reply_for_error(error: &ApiError) -> &'static str {
    match error {
        ApiError::Network(_) => CONNECTION_ERROR_REPLY,
        ApiError::Api { .. } => SERVICE_ERROR_REPLY,
        ApiError::Timeout | ApiError::Parse(_) | ApiError::Config(_) => UNAVAILABLE_REPLY,
    }
}
