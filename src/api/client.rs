//! Chatbot backend client.
//!
//! One endpoint, one shape: POST `{base_url}/api/chatbot/` with a JSON
//! query, JSON payload back. The whole exchange runs under a single
//! deadline so a stalled backend cannot wedge the widget in its loading
//! state.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;

use crate::core::config::ResolvedConfig;

use super::provider::{ApiError, QueryProvider};
use super::types::QueryRequest;

/// Path of the chatbot endpoint, relative to the configured origin.
pub const CHATBOT_PATH: &str = "/api/chatbot/";

/// Header carrying the anti-forgery token, when one is configured.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP client for the chatbot backend.
pub struct ChatbotClient {
    base_url: String,
    csrf_token: Option<String>,
    client: reqwest::Client,
}

impl ChatbotClient {
    /// Builds a client for the given origin with a per-request deadline.
    pub fn new(
        base_url: String,
        csrf_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            base_url,
            csrf_token,
            client,
        })
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ApiError> {
        Self::new(
            config.base_url.clone(),
            config.csrf_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl QueryProvider for ChatbotClient {
    fn name(&self) -> &str {
        "chatbot"
    }

    async fn send_query(&self, query: &str) -> Result<Value, ApiError> {
        info!(
            "Chatbot request: {} chars to {}{}",
            query.len(),
            self.base_url,
            CHATBOT_PATH
        );

        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, CHATBOT_PATH))
            .json(&QueryRequest { query });

        // No token means no header at all, not an empty one.
        if let Some(ref token) = self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        debug!("Chatbot response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chatbot API error: {} - {}", status, err_body);
            return Err(ApiError::Api {
                status,
                message: err_body,
            });
        }

        // The deadline covers body collection too, so a send that beat the
        // clock can still time out here.
        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Parse(e.to_string())
            }
        })
    }
}
