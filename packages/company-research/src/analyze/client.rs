//! Client for the local `/analyze` endpoint.

use reqwest::{header, Client};
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::types::{AnalyzeRequest, AnalyzeResponse};
use crate::error::AnalyzeError;

pub const DEFAULT_ANALYZE_ENDPOINT: &str = "http://127.0.0.1:8000/analyze";

/// Posts company questions to an analysis endpoint. No retries.
#[derive(Clone)]
pub struct AnalyzeClient {
    http_client: Client,
    endpoint: String,
}

impl Default for AnalyzeClient {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYZE_ENDPOINT)
    }
}

impl AnalyzeClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask `query` about `company_name`.
    ///
    /// `additional_context` is sent as an empty object when absent.
    pub async fn analyze(
        &self,
        company_name: &str,
        query: &str,
        additional_context: Option<Map<String, Value>>,
    ) -> Result<AnalyzeResponse, AnalyzeError> {
        let body = AnalyzeRequest {
            company_name: company_name.to_string(),
            query: query.to_string(),
            additional_context: Some(additional_context.unwrap_or_default()),
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, company = %company_name, error = %e, "Analysis request failed");
                AnalyzeError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                endpoint = %self.endpoint,
                company = %company_name,
                status = %status,
                body = %body,
                "Analysis endpoint returned an error"
            );
            return Err(AnalyzeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AnalyzeResponse = response.json().await.map_err(AnalyzeError::Decode)?;
        debug!(company = %company_name, chars = parsed.response.len(), "Analysis received");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        assert_eq!(AnalyzeClient::default().endpoint(), DEFAULT_ANALYZE_ENDPOINT);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = AnalyzeClient::new("http://127.0.0.1:1/analyze");
        let err = client.analyze("Apple", "What do they sell?", None).await.unwrap_err();

        assert!(matches!(err, AnalyzeError::Transport(_)));
    }
}
