//! Typed errors for company research.
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`.

use chat_client::ChatError;
use thiserror::Error;

/// Result type for research operations.
pub type Result<T> = std::result::Result<T, ResearchError>;

/// Errors raised while fetching or exporting company facts.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Caller passed something unusable (e.g. an empty company name)
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Completion service failed (transport, non-2xx, undecodable body)
    #[error("completion failed: {0}")]
    Completion(#[from] ChatError),

    /// Workbook could not be built or saved
    #[error("export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

/// Errors raised by the analysis endpoint client.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Request never produced a response (connect, timeout, TLS)
    #[error("request to analysis endpoint failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    /// Body was not the JSON we expected
    #[error("could not decode analysis response: {0}")]
    Decode(#[source] reqwest::Error),
}
