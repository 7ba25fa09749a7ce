//! Best-effort recovery of a [`CompanyRecord`] from a model reply.
//!
//! Models are asked for a JSON object but routinely wrap it in markdown
//! fences, drop a brace, or answer in `key: value` lines instead. The
//! repair here improves the odds for near-miss JSON; it guarantees nothing.
//!
//! Order of attempts:
//! 1. trim and strip code fences
//! 2. force a leading `{` and trailing `}`
//! 3. strict JSON parse
//! 4. line-oriented `key: value` extraction
//!
//! `None` only comes back when step 4 finds no pairs at all.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::record::CompanyRecord;

static RE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?i:json)?\s*|\s*```").unwrap());

/// Normalize a raw completion into a record.
pub fn normalize(raw: &str) -> Option<CompanyRecord> {
    let stripped = strip_fences(raw);
    let repaired = repair_boundaries(&stripped);

    match parse_json(&repaired) {
        Ok(record) => {
            debug!(fields = record.len(), "Parsed completion as JSON");
            Some(record)
        }
        Err(e) => {
            warn!(error = %e, "Completion is not valid JSON, falling back to line extraction");
            debug!(raw = %repaired, "Raw completion");

            let record = parse_lines(&stripped);
            if record.is_empty() {
                warn!("No key/value pairs found in completion");
                None
            } else {
                debug!(fields = record.len(), "Recovered fields from lines");
                Some(record)
            }
        }
    }
}

/// Trim the text and remove markdown code fences wherever they appear.
pub fn strip_fences(text: &str) -> String {
    RE_FENCE.replace_all(text.trim(), "").trim().to_string()
}

/// Make sure the text starts with `{` and ends with `}`.
///
/// Idempotent: repairing a repaired string returns it unchanged.
pub fn repair_boundaries(text: &str) -> String {
    let mut repaired = String::with_capacity(text.len() + 2);
    if !text.starts_with('{') {
        repaired.push('{');
    }
    repaired.push_str(text);
    if !repaired.ends_with('}') {
        repaired.push('}');
    }
    repaired
}

/// Strict JSON parse of an object into a record.
///
/// Every key is kept. Strings pass through, `null` counts as absent, and
/// any other value is stored as its compact JSON text.
pub fn parse_json(text: &str) -> serde_json::Result<CompanyRecord> {
    let object: IndexMap<String, Value> = serde_json::from_str(text)?;

    Ok(object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Pull `key: value` pairs out of free text, one per line.
///
/// Splits each line at its first colon. Double quotes are dropped from both
/// sides, as are a trailing comma on the value and stray object braces at
/// either end of the line. Keys outside the well-known set are kept.
pub fn parse_lines(text: &str) -> CompanyRecord {
    let mut record = CompanyRecord::new();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let key = key.trim().trim_start_matches('{').replace('"', "");
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = value.trim().trim_end_matches('}').trim_end();
        let value = value.strip_suffix(',').unwrap_or(value);
        let value = value.replace('"', "");

        record.insert(key, value.trim());
    }

    record
}
