use std::fmt;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use super::types::{classify_payload, reply_for_error};

/// Errors that can occur while querying the chatbot backend.
/// Each variant maps onto exactly one canned fallback reply.
#[derive(Debug)]
pub enum ApiError {
    /// Client could not be built (bad TLS setup, unusable settings).
    Config(String),
    /// The request never completed (DNS, refused connection, broken pipe).
    Network(String),
    /// The reply deadline expired before the backend finished answering.
    Timeout,
    /// The backend completed the exchange with a failure status.
    Api { status: u16, message: String },
    /// The response body was not valid JSON.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// A backend that can answer one chat query at a time.
///
/// The widget only ever talks to the real HTTP client, but the seam keeps
/// the event loop testable without a server.
#[async_trait]
pub trait QueryProvider: Send + Sync {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Sends one user query and returns the raw JSON payload.
    async fn send_query(&self, query: &str) -> Result<Value, ApiError>;
}

/// Resolves a query into display text.
///
/// Always returns something to show: successful payloads go through
/// classification and failures map onto the fallback table, so the caller
/// can append the result to the transcript unconditionally.
pub async fn resolve_reply(provider: &dyn QueryProvider, query: &str) -> String {
    match provider.send_query(query).await {
        Ok(payload) => {
            let reply = classify_payload(&payload);
            debug!("{} reply classified: {} chars", provider.name(), reply.len());
            reply
        }
        Err(e) => {
            warn!("{} query failed: {}", provider.name(), e);
            reply_for_error(&e).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{CONNECTION_ERROR_REPLY, REPHRASE_REPLY, UNAVAILABLE_REPLY};
    use crate::test_support::{StubOutcome, StubProvider};
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_reply_classifies_payload() {
        let provider = StubProvider(StubOutcome::Payload(json!({
            "success": true,
            "response": "We ship worldwide."
        })));
        let reply = resolve_reply(&provider, "do you ship?").await;
        assert_eq!(reply, "We ship worldwide.");
    }

    #[tokio::test]
    async fn test_resolve_reply_maps_backend_error_field() {
        let provider = StubProvider(StubOutcome::Payload(json!({
            "success": false,
            "error": "unparseable query"
        })));
        let reply = resolve_reply(&provider, "???").await;
        assert_eq!(reply, REPHRASE_REPLY);
    }

    #[tokio::test]
    async fn test_resolve_reply_never_surfaces_raw_errors() {
        let provider = StubProvider(StubOutcome::Network);
        let reply = resolve_reply(&provider, "hello").await;
        assert_eq!(reply, CONNECTION_ERROR_REPLY);

        let provider = StubProvider(StubOutcome::Timeout);
        let reply = resolve_reply(&provider, "hello").await;
        assert_eq!(reply, UNAVAILABLE_REPLY);
    }
}
