//! Package repository reachability probe.
//!
//! Advisory only: `status` and `setup --preflight` use it to tell an
//! unreachable mirror apart from a broken interpreter before any install
//! runs. The check flow itself never goes through here and carries no
//! timeout of its own.

use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Relative path of the source package index every CRAN-compatible mirror
/// serves.
const PACKAGES_INDEX: &str = "src/contrib/PACKAGES";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of probing a repository, serializable for `status --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryStatus {
    pub url: String,
    pub reachable: bool,
    /// HTTP status or transport error description.
    pub detail: String,
}

/// Probes a repository's package index over HTTP.
pub struct RepositoryProbe {
    client: Client,
    timeout: Duration,
}

impl RepositoryProbe {
    /// Probe with the default 10-second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("larder/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the package index of the repository at `base_url`.
    pub fn check(&self, base_url: &str) -> RepositoryStatus {
        let url = index_url(base_url);
        debug!("probing repository index {url}");

        match self.client.get(&url).send() {
            Ok(response) => {
                let status = response.status();
                RepositoryStatus {
                    url: base_url.to_string(),
                    reachable: status.is_success(),
                    detail: format!("HTTP {status}"),
                }
            }
            Err(error) => RepositoryStatus {
                url: base_url.to_string(),
                reachable: false,
                detail: error.to_string(),
            },
        }
    }
}

impl Default for RepositoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn index_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/{PACKAGES_INDEX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn index_url_handles_trailing_slash() {
        assert_eq!(
            index_url("https://cloud.r-project.org/"),
            "https://cloud.r-project.org/src/contrib/PACKAGES"
        );
        assert_eq!(
            index_url("https://cloud.r-project.org"),
            "https://cloud.r-project.org/src/contrib/PACKAGES"
        );
    }

    #[test]
    fn reachable_repository_reports_http_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/src/contrib/PACKAGES");
            then.status(200).body("Package: zoo\n");
        });

        let status = RepositoryProbe::new().check(&server.base_url());

        mock.assert();
        assert!(status.reachable);
        assert!(status.detail.contains("200"));
    }

    #[test]
    fn missing_index_is_unreachable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/src/contrib/PACKAGES");
            then.status(404);
        });

        let status = RepositoryProbe::new().check(&server.base_url());

        assert!(!status.reachable);
        assert!(status.detail.contains("404"));
    }

    #[test]
    fn refused_connection_is_unreachable() {
        // Reserved port with nothing listening.
        let status =
            RepositoryProbe::with_timeout(Duration::from_millis(500)).check("http://127.0.0.1:1");
        assert!(!status.reachable);
        assert!(!status.detail.is_empty());
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        assert_eq!(RepositoryProbe::new().timeout(), Duration::from_secs(10));
    }
}
