//! Normalization of raw JSON containers into record collections.
//!
//! Malformed top-level JSON (not parseable, or not an array) fails the
//! whole load. A malformed individual element (not an object) is skipped
//! with a warning rather than aborting the batch, so one bad entry cannot
//! poison an otherwise usable file.

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::resolver::{DEFAULT_HOSTING_DOMAIN, host_matches};

use super::error::NormalizeError;
use super::model::{PocRecord, ReportRecord};

/// Author value used when no explicit author exists and none can be inferred.
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Severity value used when the source entry carries none.
const DEFAULT_SEVERITY: &str = "Medium";

/// A normalized collection in one of the two recognized shapes.
///
/// The shapes are not merged: a flat CVE list centers a severity-rated
/// entry, a report list centers a dual-link changelog entry.
#[derive(Debug, Clone)]
pub enum LoadedRecords {
    /// Flat list of severity-rated proof-of-concept entries.
    Pocs(Vec<PocRecord>),
    /// Flattened `new`/`updated` entries from a list of report objects.
    Reports(Vec<ReportRecord>),
}

impl LoadedRecords {
    /// Number of normalized records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Pocs(records) => records.len(),
            Self::Reports(records) => records.len(),
        }
    }

    /// Returns true if no records were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses JSON text, detects the container shape, and normalizes it.
///
/// Shape detection: an array whose first object element carries a `new`
/// or `updated` key is treated as a report list; anything else is treated
/// as a flat CVE list.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the text is not valid JSON or the
/// top-level value is not an array.
pub fn load_records(text: &str) -> Result<LoadedRecords, NormalizeError> {
    let value: Value = serde_json::from_str(text).map_err(NormalizeError::parse)?;
    let entries = value.as_array().ok_or_else(|| NormalizeError::not_an_array(&value))?;

    let is_report_shape = entries
        .iter()
        .find_map(Value::as_object)
        .is_some_and(|object| object.contains_key("new") || object.contains_key("updated"));

    if is_report_shape {
        Ok(LoadedRecords::Reports(normalize_report_entries(&value)?))
    } else {
        Ok(LoadedRecords::Pocs(normalize_poc_entries(&value)?))
    }
}

/// Normalizes a flat list of CVE objects into [`PocRecord`]s.
///
/// Field mapping: `CVE ID` → identifier, `Author` → author, `Date` → date,
/// `Severity` → severity (first letter capitalized, `"Medium"` default),
/// `Link` → link. When `Author` is absent and `Link` points at the
/// recognized hosting domain, the author is inferred from the first URL
/// path segment; otherwise it falls back to `"Unknown"`.
///
/// # Errors
///
/// Returns [`NormalizeError::NotAnArray`] if `value` is not an array.
pub fn normalize_poc_entries(value: &Value) -> Result<Vec<PocRecord>, NormalizeError> {
    normalize_poc_entries_for_host(value, DEFAULT_HOSTING_DOMAIN)
}

/// Same as [`normalize_poc_entries`] with an explicit hosting domain for
/// author inference.
///
/// # Errors
///
/// Returns [`NormalizeError::NotAnArray`] if `value` is not an array.
pub fn normalize_poc_entries_for_host(
    value: &Value,
    hosting_domain: &str,
) -> Result<Vec<PocRecord>, NormalizeError> {
    let entries = value.as_array().ok_or_else(|| NormalizeError::not_an_array(value))?;

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(object) = entry.as_object() else {
            warn!(index, "skipping non-object entry in CVE list");
            continue;
        };

        let link = string_field(object, "Link").unwrap_or_default();
        let author = string_field(object, "Author")
            .or_else(|| infer_author(&link, hosting_domain))
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let severity = capitalize_first(
            &string_field(object, "Severity").unwrap_or_else(|| DEFAULT_SEVERITY.to_string()),
        );

        records.push(PocRecord {
            sequence_id: records.len() as u64 + 1,
            identifier: string_field(object, "CVE ID").unwrap_or_default(),
            author,
            date: string_field(object, "Date").unwrap_or_default(),
            severity,
            link,
            raw: entry.clone(),
        });
    }

    debug!(records = records.len(), "normalized CVE list");
    Ok(records)
}

/// Normalizes a list of report objects into flattened [`ReportRecord`]s.
///
/// For each report, entries from the `new` sub-list are taken first, then
/// entries from `updated`, preserving input order throughout. No author
/// inference is performed for this shape.
///
/// # Errors
///
/// Returns [`NormalizeError::NotAnArray`] if `value` is not an array.
pub fn normalize_report_entries(value: &Value) -> Result<Vec<ReportRecord>, NormalizeError> {
    let reports = value.as_array().ok_or_else(|| NormalizeError::not_an_array(value))?;

    let mut records = Vec::new();
    for (index, report) in reports.iter().enumerate() {
        let Some(object) = report.as_object() else {
            warn!(index, "skipping non-object report entry");
            continue;
        };

        for key in ["new", "updated"] {
            let Some(section) = object.get(key).and_then(Value::as_array) else {
                continue;
            };
            for entry in section {
                let Some(fields) = entry.as_object() else {
                    warn!(index, section = key, "skipping non-object report sub-entry");
                    continue;
                };
                records.push(ReportRecord {
                    sequence_id: records.len() as u64 + 1,
                    identifier: string_field(fields, "cveId").unwrap_or_default(),
                    date_updated: string_field(fields, "dateUpdated").unwrap_or_default(),
                    advisory_link: string_field(fields, "cveOrgLink").unwrap_or_default(),
                    link: string_field(fields, "githubLink").unwrap_or_default(),
                    raw: entry.clone(),
                });
            }
        }
    }

    debug!(records = records.len(), "normalized report list");
    Ok(records)
}

/// Extracts a string field from a JSON object; non-string values count as absent.
fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Infers the author from the first path segment of a recognized-host link.
fn infer_author(link: &str, hosting_domain: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    let host = parsed.host_str()?;
    if !host_matches(host, hosting_domain) {
        return None;
    }
    parsed
        .path_segments()?
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Capitalizes the first character, leaving the remainder untouched.
fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
