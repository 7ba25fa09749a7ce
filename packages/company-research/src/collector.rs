//! Drives a collection run: fetch, normalize, accumulate, export.

use std::path::Path;

use tracing::{error, info, warn};

use crate::error::Result;
use crate::exporter::write_workbook;
use crate::fetcher::CompanyFetcher;
use crate::normalizer::normalize;
use crate::record::ResultSet;

pub const DEFAULT_COMPANIES: [&str; 3] = ["Apple", "Microsoft", "Amazon"];

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    /// Companies with a normalized record.
    pub normalized: usize,
    /// Fetched, but the reply yielded nothing usable.
    pub unparsed: usize,
    /// Fetch failed; company left out of the result set.
    pub fetch_failed: usize,
    /// Data rows in the written workbook.
    pub rows_written: usize,
}

/// Process `companies` strictly one after another.
///
/// A fetch failure leaves the company out of the result set; a reply that
/// cannot be normalized is stored as `None`. Neither stops the run.
pub async fn collect<S: AsRef<str>>(
    fetcher: &CompanyFetcher,
    companies: &[S],
) -> (ResultSet, RunSummary) {
    let mut results = ResultSet::new();
    let mut summary = RunSummary::default();

    for company in companies {
        let company = company.as_ref().trim();
        summary.attempted += 1;

        let raw = match fetcher.fetch(company).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(company = %company, error = %e, "Error processing company");
                summary.fetch_failed += 1;
                continue;
            }
        };

        let record = normalize(&raw);
        match &record {
            Some(_) => summary.normalized += 1,
            None => {
                warn!(company = %company, "Failed to parse data for company");
                summary.unparsed += 1;
            }
        }
        results.record(company, record);
    }

    (results, summary)
}

/// Collect `companies` and write the workbook to `output`.
///
/// Always writes a file, even when every company failed.
pub async fn run<S: AsRef<str>>(
    fetcher: &CompanyFetcher,
    companies: &[S],
    output: impl AsRef<Path>,
) -> Result<RunSummary> {
    let (results, mut summary) = collect(fetcher, companies).await;
    summary.rows_written = write_workbook(results, output)?;

    info!(
        attempted = summary.attempted,
        normalized = summary.normalized,
        unparsed = summary.unparsed,
        fetch_failed = summary.fetch_failed,
        rows = summary.rows_written,
        "Collection run complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::MockChat;

    fn fetcher(chat: &MockChat) -> CompanyFetcher {
        CompanyFetcher::new(Arc::new(chat.clone()), "test-model")
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_stored_as_none() {
        let chat = MockChat::new()
            .with_reply("Apple", r#"{"industry": "Tech"}"#)
            .with_reply("Acme", "Sorry, I don't know that company.");

        let (results, summary) = collect(&fetcher(&chat), &["Apple", "Acme"]).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results.get("Acme"), Some(None));
        assert_eq!(summary.normalized, 1);
        assert_eq!(summary.unparsed, 1);
        assert_eq!(summary.fetch_failed, 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_omits_company_and_continues() {
        let chat = MockChat::new()
            .with_reply("Apple", r#"{"industry": "Tech"}"#)
            .with_failure("Microsoft", "timeout")
            .with_reply("Amazon", "industry: Retail");

        let (results, summary) = collect(&fetcher(&chat), &DEFAULT_COMPANIES).await;

        assert!(!results.contains("Microsoft"));
        assert_eq!(
            results.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            vec!["Apple", "Amazon"]
        );
        assert_eq!(summary.fetch_failed, 1);
        assert_eq!(chat.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_names_are_trimmed_before_storing() {
        let chat = MockChat::new().with_reply("Apple", r#"{"industry": "Tech"}"#);

        let (results, _) = collect(&fetcher(&chat), &["  Apple ", "Apple"]).await;

        assert_eq!(results.len(), 1);
        assert!(results.contains("Apple"));
        assert!(!results.contains("  Apple "));
        assert_eq!(chat.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_companies_are_processed_in_order() {
        let chat = MockChat::new();
        collect(&fetcher(&chat), &["B", "A", "C"]).await;

        let asked: Vec<_> = chat
            .calls()
            .iter()
            .map(|c| c.user_content().unwrap_or_default().to_string())
            .collect();
        assert!(asked[0].contains(" B:"));
        assert!(asked[1].contains(" A:"));
        assert!(asked[2].contains(" C:"));
    }
}
