//! HTTP service answering free-form questions about a company.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chat_client::{ChatCompletion, ChatRequest};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::types::{AnalyzeRequest, AnalyzeResponse};

pub const DEFAULT_ANALYZE_MODEL: &str = "gpt-4o-mini";

/// Origin of the browser form that talks to this service in development.
pub const FORM_ORIGIN: &str = "http://localhost:5173";

/// Fixed until the completion service exposes a usable confidence signal.
pub const CONFIDENCE_SCORE: f64 = 0.95;

const SYSTEM_PROMPT: &str =
    "You are an assistant that supports desk research on companies and services.";

pub fn analysis_prompt(
    company_name: &str,
    query: &str,
    context: Option<&Map<String, Value>>,
) -> String {
    let context = match context {
        Some(map) if !map.is_empty() => Value::Object(map.clone()).to_string(),
        _ => "none".to_string(),
    };

    format!(
        "Answer the following question about {company_name}.\n\
         Question: {query}\n\n\
         Additional context: {context}"
    )
}

/// Shared state for the analysis routes.
#[derive(Clone)]
pub struct AnalyzeService {
    chat: Arc<dyn ChatCompletion>,
    model: String,
}

impl AnalyzeService {
    pub fn new(chat: Arc<dyn ChatCompletion>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }

    /// Answer one request through the completion service.
    pub async fn answer(&self, request: AnalyzeRequest) -> chat_client::Result<AnalyzeResponse> {
        let prompt = analysis_prompt(
            &request.company_name,
            &request.query,
            request.additional_context.as_ref(),
        );

        let completion = self
            .chat
            .complete(ChatRequest::exchange(&self.model, SYSTEM_PROMPT, prompt))
            .await?;

        Ok(AnalyzeResponse {
            company_name: request.company_name,
            query: request.query,
            response: completion.content.unwrap_or_default(),
            confidence_score: CONFIDENCE_SCORE,
        })
    }
}

/// Error body in the `{"detail": ...}` shape the form expects.
#[derive(Debug, Serialize)]
struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Company LLM API is running" }))
}

async fn analyze_handler(
    State(service): State<AnalyzeService>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let company = request.company_name.clone();
    info!(company = %company, "Analyzing company");

    service.answer(request).await.map(Json).map_err(|e| {
        error!(company = %company, error = %e, "Analysis failed");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("An error occurred: {e}"),
        }
    })
}

/// Build the router: `GET /` liveness and `POST /analyze`.
pub fn build_app(service: AnalyzeService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static(FORM_ORIGIN))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/analyze", post(analyze_handler))
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::testing::MockChat;

    fn app(chat: &MockChat) -> Router {
        build_app(AnalyzeService::new(Arc::new(chat.clone()), "test-model"))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn analyze_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_prompt_without_context_says_none() {
        let prompt = analysis_prompt("Apple", "Who are their competitors?", None);
        assert!(prompt.contains("about Apple."));
        assert!(prompt.contains("Question: Who are their competitors?"));
        assert!(prompt.ends_with("Additional context: none"));

        let empty = Map::new();
        assert!(analysis_prompt("Apple", "q", Some(&empty)).ends_with("context: none"));
    }

    #[test]
    fn test_prompt_embeds_context_json() {
        let mut context = Map::new();
        context.insert("region".into(), json!("EMEA"));
        let prompt = analysis_prompt("Apple", "q", Some(&context));
        assert!(prompt.ends_with(r#"Additional context: {"region":"EMEA"}"#));
    }

    #[tokio::test]
    async fn test_root_reports_running() {
        let response = app(&MockChat::new())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Company LLM API is running" })
        );
    }

    #[tokio::test]
    async fn test_analyze_returns_completion() {
        let chat = MockChat::new().with_reply("Apple", "They sell phones.");
        let response = app(&chat)
            .oneshot(analyze_request(json!({
                "company_name": "Apple",
                "query": "What do they sell?",
                "additional_context": {}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["company_name"], "Apple");
        assert_eq!(body["query"], "What do they sell?");
        assert_eq!(body["response"], "They sell phones.");
        assert_eq!(body["confidence_score"], 0.95);

        let calls = chat.calls();
        assert_eq!(calls[0].model, "test-model");
        assert_eq!(calls[0].messages[0].content, SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_completion_failure_is_500_with_detail() {
        let chat = MockChat::new().with_failure("Apple", "upstream down");
        let response = app(&chat)
            .oneshot(analyze_request(json!({
                "company_name": "Apple",
                "query": "Revenue?"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("An error occurred:"));
        assert!(detail.contains("upstream down"));
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let response = app(&MockChat::new())
            .oneshot(analyze_request(json!({ "company_name": "Apple" })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_cors_allows_form_origin() {
        let response = app(&MockChat::new())
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, FORM_ORIGIN)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            FORM_ORIGIN
        );
    }
}
