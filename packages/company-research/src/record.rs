//! Normalized company records and the per-run result set.

use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use serde::Serialize;

pub const INDUSTRY: &str = "industry";
pub const SIZE: &str = "size";
pub const REVENUE: &str = "revenue";
pub const WEBSITE_URL: &str = "website_url";
pub const DESCRIPTION: &str = "description";

/// The keys the collector asks the model for, in column order.
pub const WELL_KNOWN_KEYS: [&str; 5] = [INDUSTRY, SIZE, REVENUE, WEBSITE_URL, DESCRIPTION];

/// Facts about one company, as recovered from a model reply.
///
/// This is a loose string bag: the five [`WELL_KNOWN_KEYS`] have typed
/// accessors, and any other key the model produced is kept as-is. A missing
/// key means the fact is unknown; it is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompanyRecord {
    fields: IndexMap<String, String>,
}

impl CompanyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn industry(&self) -> Option<&str> {
        self.get(INDUSTRY)
    }

    pub fn size(&self) -> Option<&str> {
        self.get(SIZE)
    }

    pub fn revenue(&self) -> Option<&str> {
        self.get(REVENUE)
    }

    pub fn website_url(&self) -> Option<&str> {
        self.get(WEBSITE_URL)
    }

    pub fn description(&self) -> Option<&str> {
        self.get(DESCRIPTION)
    }

    /// Keys outside [`WELL_KNOWN_KEYS`] that the model volunteered.
    pub fn extra_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|k| !WELL_KNOWN_KEYS.contains(k))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for CompanyRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Everything a collection run learned, keyed by company name.
///
/// `None` means the company was fetched but its reply could not be
/// normalized. Companies whose fetch failed are absent altogether.
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: IndexMap<String, Option<CompanyRecord>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome for a company. A repeated name keeps its original
    /// position but takes the newer outcome.
    pub fn record(&mut self, company: impl Into<String>, outcome: Option<CompanyRecord>) {
        self.entries.insert(company.into(), outcome);
    }

    /// Outer `None`: never stored. Inner `None`: stored as a normalization failure.
    pub fn get(&self, company: &str) -> Option<Option<&CompanyRecord>> {
        self.entries.get(company).map(Option::as_ref)
    }

    pub fn contains(&self, company: &str) -> bool {
        self.entries.contains_key(company)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of companies with a usable record.
    pub fn normalized_count(&self) -> usize {
        self.entries.values().filter(|r| r.is_some()).count()
    }

    pub fn iter(&self) -> Iter<'_, String, Option<CompanyRecord>> {
        self.entries.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = (String, Option<CompanyRecord>);
    type IntoIter = IntoIter<String, Option<CompanyRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = (&'a String, &'a Option<CompanyRecord>);
    type IntoIter = Iter<'a, String, Option<CompanyRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_and_extra_keys() {
        let record = CompanyRecord::new()
            .with("industry", "Technology")
            .with("ceo", "Tim Cook")
            .with("revenue", "$394B");

        assert_eq!(record.industry(), Some("Technology"));
        assert_eq!(record.revenue(), Some("$394B"));
        assert_eq!(record.size(), None);
        assert_eq!(record.extra_keys().collect::<Vec<_>>(), vec!["ceo"]);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_result_set_distinguishes_null_from_absent() {
        let mut results = ResultSet::new();
        results.record("Apple", Some(CompanyRecord::new().with("industry", "Tech")));
        results.record("Acme", None);

        assert!(matches!(results.get("Apple"), Some(Some(_))));
        assert_eq!(results.get("Acme"), Some(None));
        assert_eq!(results.get("Microsoft"), None);
        assert_eq!(results.len(), 2);
        assert_eq!(results.normalized_count(), 1);
    }

    #[test]
    fn test_result_set_keeps_insertion_order() {
        let mut results = ResultSet::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            results.record(name, None);
        }
        results.record("Zeta", Some(CompanyRecord::new()));

        let names: Vec<_> = results.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(results.get("Zeta"), Some(Some(&CompanyRecord::new())));
    }

    #[test]
    fn test_record_serializes_as_flat_object() {
        let record = CompanyRecord::new().with("industry", "Tech").with("size", "Large");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"industry":"Tech","size":"Large"}"#);
    }
}
