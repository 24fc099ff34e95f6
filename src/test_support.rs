//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, QueryProvider};
use crate::core::config::DEFAULT_GREETING;
use crate::core::state::ChatWidget;

/// What a `StubProvider` produces for every query.
pub enum StubOutcome {
    /// A decoded backend payload
    Payload(Value),
    /// A transport-level failure
    Network,
    /// A request deadline hit
    Timeout,
    /// A non-2xx response
    Status(u16),
    /// A body that didn't decode as JSON
    Parse,
}

/// Canned provider for tests that don't need a real HTTP server.
pub struct StubProvider(pub StubOutcome);

#[async_trait]
impl QueryProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn send_query(&self, _query: &str) -> Result<Value, ApiError> {
        match &self.0 {
            StubOutcome::Payload(payload) => Ok(payload.clone()),
            StubOutcome::Network => Err(ApiError::Network("connection refused".to_string())),
            StubOutcome::Timeout => Err(ApiError::Timeout),
            StubOutcome::Status(status) => Err(ApiError::Api {
                status: *status,
                message: "internal error".to_string(),
            }),
            StubOutcome::Parse => Err(ApiError::Parse("expected value at line 1".to_string())),
        }
    }
}

/// Creates a widget seeded with the default greeting.
pub fn test_widget() -> ChatWidget {
    ChatWidget::new(DEFAULT_GREETING)
}
