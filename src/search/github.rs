//! Repository search client for the code-hosting search API.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::error::SearchError;

/// Default API base URL for repository search.
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Placeholder shown when a repository has no description.
const NO_DESCRIPTION: &str = "No description";

// ==================== API Response Types ====================

/// Top-level repository search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<RawRepository>,
}

/// A repository entry as returned by the search endpoint.
#[derive(Debug, Deserialize)]
struct RawRepository {
    name: String,
    description: Option<String>,
    owner: RawOwner,
    stargazers_count: u64,
    html_url: String,
}

/// The `owner` object nested in a repository entry.
#[derive(Debug, Deserialize)]
struct RawOwner {
    login: String,
}

/// A repository search hit, produced fresh per search call.
///
/// Ephemeral by design: a new search replaces the previous results, and
/// nothing here is persisted.
#[derive(Debug, Clone)]
pub struct RepoHit {
    /// Repository name.
    pub name: String,
    /// Description, with a fixed placeholder substituted when absent.
    pub description: String,
    /// Owner login.
    pub owner_login: String,
    /// Star count.
    pub star_count: u64,
    /// Web URL of the repository.
    pub html_url: String,
}

impl From<RawRepository> for RepoHit {
    fn from(raw: RawRepository) -> Self {
        Self {
            name: raw.name,
            description: raw.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            owner_login: raw.owner.login,
            star_count: raw.stargazers_count,
            html_url: raw.html_url,
        }
    }
}

// ==================== GitHubSearchClient ====================

/// Searches the code-hosting repository search API for CVE proof-of-concepts.
///
/// The query combines a literal `CVE-<year>` token with free text. An
/// optional access token (from [`crate::config::Config`]) is sent as a
/// bearer authorization header for higher rate limits; the token is
/// explicit constructor input, not ambient process state.
pub struct GitHubSearchClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubSearchClient {
    /// Creates a client for the default API base URL.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("cve-toolkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    /// Searches repositories matching `CVE-<year>` plus free text.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on network failure, non-success status, or
    /// a response body that does not match the expected shape.
    #[instrument(skip(self), fields(year))]
    pub async fn search(&self, year: u16, query: &str) -> Result<Vec<RepoHit>, SearchError> {
        let url = format!("{}/search/repositories", self.base_url);
        let terms = format!("CVE-{year} {query}");
        debug!(terms = %terms, "searching repositories");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .query(&[("q", terms.as_str())]);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::http_status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|source| SearchError::MalformedResponse { source })?;

        debug!(hits = body.items.len(), "search complete");
        Ok(body.items.into_iter().map(RepoHit::from).collect())
    }
}

impl std::fmt::Debug for GitHubSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSearchClient")
            .field("base_url", &self.base_url)
            .field("token_configured", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_hit_substitutes_description_placeholder() {
        let raw = RawRepository {
            name: "poc".to_string(),
            description: None,
            owner: RawOwner {
                login: "alice".to_string(),
            },
            stargazers_count: 7,
            html_url: "https://github.com/alice/poc".to_string(),
        };
        let hit = RepoHit::from(raw);
        assert_eq!(hit.description, "No description");
        assert_eq!(hit.owner_login, "alice");
        assert_eq!(hit.star_count, 7);
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = GitHubSearchClient::new(Some("ghp_secret".to_string()));
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("ghp_secret"), "{rendered}");
        assert!(rendered.contains("token_configured"), "{rendered}");
    }
}
