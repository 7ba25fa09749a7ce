//! Asks the completion service about one company at a time.

use std::sync::Arc;

use chat_client::{ChatCompletion, ChatRequest};
use tracing::{debug, info};

use crate::error::{ResearchError, Result};

pub const DEFAULT_RESEARCH_MODEL: &str = "gpt-4o-mini-2024-07-18";

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that provides accurate company information.";

/// Builds the per-company instruction.
pub fn company_prompt(company: &str) -> String {
    format!(
        "Provide the following information for {company}: industry, size, revenue, \
         website_url, brief description. Format the response as a JSON object with these keys."
    )
}

/// Sends one prompt per company and returns the raw completion text.
#[derive(Clone)]
pub struct CompanyFetcher {
    chat: Arc<dyn ChatCompletion>,
    model: String,
}

impl CompanyFetcher {
    pub fn new(chat: Arc<dyn ChatCompletion>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fetch the raw reply for `company`.
    ///
    /// Returns an empty string when the service answers without content.
    /// Transport and API failures are returned as-is; nothing is retried.
    pub async fn fetch(&self, company: &str) -> Result<String> {
        let company = company.trim();
        if company.is_empty() {
            return Err(ResearchError::InvalidInput {
                reason: "company name must not be empty".into(),
            });
        }

        info!(company = %company, model = %self.model, "Collecting company information");

        let request = ChatRequest::exchange(&self.model, SYSTEM_PROMPT, company_prompt(company));
        let response = self.chat.complete(request).await?;

        debug!(
            company = %company,
            chars = response.text().len(),
            "Received completion"
        );

        Ok(response.content.unwrap_or_default())
    }
}
