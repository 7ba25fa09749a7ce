//! Minimal OpenAI-compatible chat completion client.
//!
//! Callers depend on the [`ChatCompletion`] trait so they can be driven by a
//! scripted implementation in tests; [`ChatClient`] is the HTTP one.
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_client::{ChatClient, ChatCompletion, ChatRequest};
//!
//! let client = ChatClient::new(api_key);
//! let response = client
//!     .complete(ChatRequest::exchange("gpt-4o-mini", "You are helpful.", "Hello!"))
//!     .await?;
//! println!("{}", response.text());
//! ```

pub mod error;
pub mod types;

pub use error::{ChatError, Result};
pub use types::{ChatRequest, ChatResponse, Message, Usage};

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Anything that can turn a chat request into a completion.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// HTTP chat completion client.
#[derive(Clone)]
pub struct ChatClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl ChatClient {
    /// Create a client against the default OpenAI base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (for Azure, proxies, local gateways).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                ChatError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion API error");
            return Err(ChatError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        let response = ChatResponse::from(raw);

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            empty = response.content.is_none(),
            "Chat completion"
        );

        Ok(response)
    }
}
