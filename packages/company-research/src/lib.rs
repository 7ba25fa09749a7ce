//! Company research toolkit.
//!
//! Two jobs share one completion backend:
//!
//! - **collect**: ask a language model about a list of companies, recover a
//!   [`CompanyRecord`] from each free-text reply, and write the results to an
//!   `.xlsx` workbook.
//! - **analyze**: answer ad-hoc questions about a company over HTTP
//!   (`POST /analyze`), with a typed client for callers.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use company_research::{collector, CompanyFetcher, Config};
//!
//! let config = Config::from_env()?;
//! let fetcher = CompanyFetcher::new(Arc::new(config.chat_client()), &config.research_model);
//! let summary = collector::run(&fetcher, &["Apple", "Amazon"], "company_info.xlsx").await?;
//! ```

pub mod analyze;
pub mod collector;
pub mod config;
pub mod error;
pub mod exporter;
pub mod fetcher;
pub mod normalizer;
pub mod record;
pub mod testing;

pub use analyze::{AnalyzeClient, AnalyzeRequest, AnalyzeResponse, AnalyzeService};
pub use collector::RunSummary;
pub use config::Config;
pub use error::{AnalyzeError, ResearchError, Result};
pub use fetcher::CompanyFetcher;
pub use normalizer::normalize;
pub use record::{CompanyRecord, ResultSet};
