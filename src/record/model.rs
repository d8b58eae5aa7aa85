//! Normalized record types shared by the store and filter.

use serde_json::Value;

/// Capability shared by both record variants.
///
/// The store and the search filter only need a stable sequence id, an
/// identifier, a primary link, the verbatim raw payload, and the set of
/// displayable fields a free-text query is matched against.
pub trait NormalizedEntry {
    /// Session-stable, 1-based id assigned at load time in input order.
    fn sequence_id(&self) -> u64;

    /// Advisory identifier (e.g. `CVE-2023-0001`); may be empty.
    fn identifier(&self) -> &str;

    /// Primary outbound link; may be empty.
    fn link(&self) -> &str;

    /// The original source object, retained verbatim for lossless export.
    fn raw(&self) -> &Value;

    /// Displayable fields a free-text query is matched against.
    fn searchable_fields(&self) -> Vec<&str>;

    /// Returns true if any searchable field contains `query_lower`.
    ///
    /// `query_lower` must already be lowercased; an empty query matches
    /// every record (empty query means "no filter").
    fn matches(&self, query_lower: &str) -> bool {
        if query_lower.is_empty() {
            return true;
        }
        self.searchable_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(query_lower))
    }
}

/// A severity-rated proof-of-concept entry (flat-list input shape).
#[derive(Debug, Clone)]
pub struct PocRecord {
    /// 1-based id assigned at load time.
    pub sequence_id: u64,
    /// Advisory identifier; empty if absent from source.
    pub identifier: String,
    /// Explicit author, inferred author, or the literal "Unknown".
    pub author: String,
    /// Date string, passthrough with no parsing.
    pub date: String,
    /// Severity string, first letter capitalized; defaults to "Medium".
    pub severity: String,
    /// Outbound link; may be empty.
    pub link: String,
    /// Original source object, verbatim.
    pub raw: Value,
}

impl NormalizedEntry for PocRecord {
    fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn link(&self) -> &str {
        &self.link
    }

    fn raw(&self) -> &Value {
        &self.raw
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            &self.identifier,
            &self.author,
            &self.date,
            &self.severity,
            &self.link,
        ]
    }
}

/// A dual-link changelog entry (report input shape).
///
/// Report entries carry no author or severity; instead they expose a
/// secondary advisory link alongside the primary repository link.
#[derive(Debug, Clone)]
pub struct ReportRecord {
    /// 1-based id assigned at load time.
    pub sequence_id: u64,
    /// Advisory identifier; empty if absent from source.
    pub identifier: String,
    /// Last-updated date string, passthrough.
    pub date_updated: String,
    /// Secondary advisory link (cve.org); may be empty.
    pub advisory_link: String,
    /// Primary repository link; may be empty.
    pub link: String,
    /// Original source object, verbatim.
    pub raw: Value,
}

impl NormalizedEntry for ReportRecord {
    fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn link(&self) -> &str {
        &self.link
    }

    fn raw(&self) -> &Value {
        &self.raw
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            &self.identifier,
            &self.date_updated,
            &self.advisory_link,
            &self.link,
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_poc() -> PocRecord {
        PocRecord {
            sequence_id: 1,
            identifier: "CVE-2023-0001".to_string(),
            author: "alice".to_string(),
            date: "2023-01-02".to_string(),
            severity: "High".to_string(),
            link: "https://github.com/alice/poc".to_string(),
            raw: json!({"CVE ID": "CVE-2023-0001"}),
        }
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let record = sample_poc();
        assert!(record.matches("cve-2023"));
        assert!(record.matches("alice"));
        assert!(record.matches("high"));
    }

    #[test]
    fn test_matches_empty_query_matches_everything() {
        let record = sample_poc();
        assert!(record.matches(""));
    }

    #[test]
    fn test_matches_rejects_absent_substring() {
        let record = sample_poc();
        assert!(!record.matches("heartbleed"));
    }

    #[test]
    fn test_report_record_matches_either_link() {
        let record = ReportRecord {
            sequence_id: 1,
            identifier: "CVE-2024-9999".to_string(),
            date_updated: "2024-05-01T00:00:00Z".to_string(),
            advisory_link: "https://www.cve.org/CVERecord?id=CVE-2024-9999".to_string(),
            link: "https://github.com/bob/poc".to_string(),
            raw: json!({"cveId": "CVE-2024-9999"}),
        };
        assert!(record.matches("cve.org"));
        assert!(record.matches("bob"));
    }
}
