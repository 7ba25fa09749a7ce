//! Wire types shared by the analysis service and client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub company_name: String,
    pub query: String,
    #[serde(default)]
    pub additional_context: Option<Map<String, Value>>,
}

/// Reply from `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub company_name: String,
    pub query: String,
    pub response: String,
    pub confidence_score: f64,
}
