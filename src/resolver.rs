//! Link resolution: mapping a record's link to a downloadable archive URL.
//!
//! Links pointing at the recognized hosting domain are resolved
//! structurally (`owner/repo` → branch archive zip); every other link is
//! passed through verbatim as a direct download.

use std::fmt;

use thiserror::Error;
use url::Url;

/// The hosting domain whose `owner/repo` URL structure is understood.
pub const DEFAULT_HOSTING_DOMAIN: &str = "github.com";

/// Branch name assumed when constructing archive URLs.
///
/// Repositories whose default branch is not `main` will 404 on download;
/// branch discovery is deliberately not attempted. Override with
/// [`LinkResolver::with_branch`].
pub const DEFAULT_ARCHIVE_BRANCH: &str = "main";

/// Errors that can occur during link resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The record has no link to resolve.
    #[error("no link available")]
    NoLink,

    /// The link could not be parsed as a URL.
    #[error("invalid URL: {link}")]
    InvalidUrl {
        /// The offending link text.
        link: String,
    },

    /// A recognized-host link without the `owner/repo` path structure.
    #[error("invalid repository URL format: {link}")]
    InvalidRepoFormat {
        /// The offending link.
        link: String,
    },
}

impl ResolveError {
    /// Creates an invalid-URL error.
    pub fn invalid_url(link: impl Into<String>) -> Self {
        Self::InvalidUrl { link: link.into() }
    }

    /// Creates an invalid-repository-format error.
    pub fn invalid_repo_format(link: impl Into<String>) -> Self {
        Self::InvalidRepoFormat { link: link.into() }
    }
}

/// A resolved download target; lives only for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    /// The URL the download pipeline will stream from.
    pub archive_url: String,
    /// Basename for the destination file (repo name or last path segment).
    pub basename: String,
    /// True when the target is a repository branch archive (zip).
    pub repo_archive: bool,
}

impl fmt::Display for DownloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.archive_url, self.basename)
    }
}

/// Resolves record links into [`DownloadTarget`]s.
///
/// The recognized hosting domain and archive branch are explicit
/// configuration rather than ambient state, so tests and callers can
/// override both.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    hosting_domain: String,
    branch: String,
}

impl LinkResolver {
    /// Creates a resolver for the default hosting domain and branch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hosting_domain: DEFAULT_HOSTING_DOMAIN.to_string(),
            branch: DEFAULT_ARCHIVE_BRANCH.to_string(),
        }
    }

    /// Overrides the recognized hosting domain.
    #[must_use]
    pub fn with_hosting_domain(mut self, domain: impl Into<String>) -> Self {
        self.hosting_domain = domain.into();
        self
    }

    /// Overrides the branch used in archive URLs.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Resolves a link into a download target.
    ///
    /// Recognized-host links with at least two path segments resolve to
    /// `<scheme>://<host>/<owner>/<repo>/archive/refs/heads/<branch>.zip`;
    /// links on any other host pass through verbatim with the last path
    /// segment as basename.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoLink`] for an empty link (checked before any I/O)
    /// - [`ResolveError::InvalidUrl`] for unparseable links
    /// - [`ResolveError::InvalidRepoFormat`] for recognized-host links with
    ///   fewer than two path segments
    #[tracing::instrument(skip(self), fields(branch = %self.branch))]
    pub fn resolve(&self, link: &str) -> Result<DownloadTarget, ResolveError> {
        if link.trim().is_empty() {
            return Err(ResolveError::NoLink);
        }

        let parsed = Url::parse(link).map_err(|_| ResolveError::invalid_url(link))?;
        let host = parsed.host_str().ok_or_else(|| ResolveError::invalid_url(link))?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        if host_matches(host, &self.hosting_domain) {
            let [owner, repo, ..] = segments.as_slice() else {
                return Err(ResolveError::invalid_repo_format(link));
            };
            let port = parsed.port().map(|p| format!(":{p}")).unwrap_or_default();
            let archive_url = format!(
                "{scheme}://{host}{port}/{owner}/{repo}/archive/refs/heads/{branch}.zip",
                scheme = parsed.scheme(),
                branch = self.branch,
            );
            return Ok(DownloadTarget {
                archive_url,
                basename: (*repo).to_string(),
                repo_archive: true,
            });
        }

        let basename = segments
            .last()
            .map_or_else(|| host.to_string(), |segment| (*segment).to_string());
        Ok(DownloadTarget {
            archive_url: link.to_string(),
            basename,
            repo_archive: false,
        })
    }
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true when `host` is the recognized domain or a subdomain of it.
#[must_use]
pub fn host_matches(host: &str, recognized: &str) -> bool {
    host.eq_ignore_ascii_case(recognized)
        || host
            .to_ascii_lowercase()
            .strip_suffix(&recognized.to_ascii_lowercase())
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn resolver() -> LinkResolver {
        LinkResolver::new().with_hosting_domain("hostingsite.example")
    }

    #[test]
    fn test_resolve_repo_link_to_archive_url() {
        let target = resolver()
            .resolve("https://hostingsite.example/owner/repo")
            .unwrap();
        assert_eq!(
            target.archive_url,
            "https://hostingsite.example/owner/repo/archive/refs/heads/main.zip"
        );
        assert_eq!(target.basename, "repo");
        assert!(target.repo_archive);
    }

    #[test]
    fn test_resolve_repo_link_ignores_extra_segments() {
        let target = resolver()
            .resolve("https://hostingsite.example/owner/repo/tree/dev/src")
            .unwrap();
        assert_eq!(
            target.archive_url,
            "https://hostingsite.example/owner/repo/archive/refs/heads/main.zip"
        );
    }

    #[test]
    fn test_resolve_single_segment_fails_with_invalid_format() {
        let result = resolver().resolve("https://hostingsite.example/owner");
        assert!(matches!(result, Err(ResolveError::InvalidRepoFormat { .. })));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("invalid repository URL format"), "{message}");
    }

    #[test]
    fn test_resolve_unrecognized_host_passes_through_verbatim() {
        let target = resolver().resolve("https://files.example/x.zip").unwrap();
        assert_eq!(target.archive_url, "https://files.example/x.zip");
        assert_eq!(target.basename, "x.zip");
        assert!(!target.repo_archive);
    }

    #[test]
    fn test_resolve_empty_link_fails_before_any_io() {
        let result = resolver().resolve("");
        assert!(matches!(result, Err(ResolveError::NoLink)));
        assert_eq!(result.unwrap_err().to_string(), "no link available");
    }

    #[test]
    fn test_resolve_unparseable_link() {
        let result = resolver().resolve("not a url");
        assert!(matches!(result, Err(ResolveError::InvalidUrl { .. })));
    }

    #[test]
    fn test_branch_override_changes_archive_url() {
        let target = resolver()
            .with_branch("master")
            .resolve("https://hostingsite.example/owner/repo")
            .unwrap();
        assert!(target.archive_url.ends_with("/archive/refs/heads/master.zip"));
    }

    #[test]
    fn test_host_matches_subdomain_and_case() {
        assert!(host_matches("github.com", "github.com"));
        assert!(host_matches("GitHub.COM", "github.com"));
        assert!(host_matches("www.github.com", "github.com"));
        assert!(!host_matches("notgithub.com", "github.com"));
        assert!(!host_matches("github.com.evil.example", "github.com"));
    }

    #[test]
    fn test_resolve_preserves_port_in_archive_url() {
        let target = LinkResolver::new()
            .with_hosting_domain("127.0.0.1")
            .resolve("http://127.0.0.1:8080/owner/repo")
            .unwrap();
        assert_eq!(
            target.archive_url,
            "http://127.0.0.1:8080/owner/repo/archive/refs/heads/main.zip"
        );
    }

    #[test]
    fn test_default_resolver_uses_github() {
        let target = LinkResolver::default()
            .resolve("https://github.com/alice/poc")
            .unwrap();
        assert_eq!(
            target.archive_url,
            "https://github.com/alice/poc/archive/refs/heads/main.zip"
        );
    }
}
