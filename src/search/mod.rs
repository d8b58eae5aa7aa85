//! Remote search: code-hosting repository search and advisory search URLs.
//!
//! - [`GitHubSearchClient`] - JSON API client for the repository search
//!   endpoint, with optional bearer-token authorization
//! - [`exploit_db_url`] - advisory search URL construction (no structured
//!   response is consumed; the URL is handed to a browser)

mod error;
mod github;

pub use error::SearchError;
pub use github::{GitHubSearchClient, RepoHit};

/// Builds the advisory search URL for `CVE-<year>-<query>`.
///
/// No JSON contract applies here; the caller opens the URL in the
/// system's default browser or prints it.
#[must_use]
pub fn exploit_db_url(year: u16, query: &str) -> String {
    format!("https://www.exploit-db.com/search?q=CVE-{year}-{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exploit_db_url_combines_year_and_query() {
        assert_eq!(
            exploit_db_url(2024, "12345"),
            "https://www.exploit-db.com/search?q=CVE-2024-12345"
        );
    }
}
