//! Ad-hoc company analysis: the `/analyze` HTTP service and its client.

pub mod client;
pub mod service;
pub mod types;

pub use client::{AnalyzeClient, DEFAULT_ANALYZE_ENDPOINT};
pub use service::{build_app, AnalyzeService, DEFAULT_ANALYZE_MODEL};
pub use types::{AnalyzeRequest, AnalyzeResponse};
