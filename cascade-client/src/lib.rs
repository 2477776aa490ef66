//! Cascade HTTP Client
//!
//! A typed HTTP client for the pipeline endpoints of a GitLab-compatible
//! CI host: triggering a new run and fetching a run's current status.
//!
//! The client is constructed once and passed by reference into whatever
//! drives it; it holds no state beyond the base URL and the underlying
//! HTTP connection pool.
//!
//! # Example
//!
//! ```no_run
//! use cascade_client::GitlabClient;
//! use cascade_core::dto::pipeline::TriggerPipeline;
//! use std::collections::BTreeMap;
//!
//! # async fn example() -> cascade_client::Result<()> {
//! let client = GitlabClient::new("https://salsa.debian.org");
//!
//! let pipeline = client
//!     .trigger_pipeline(
//!         "4500",
//!         &TriggerPipeline {
//!             reference: "debian/unstable".to_string(),
//!             token: "glptt-...".to_string(),
//!             variables: BTreeMap::new(),
//!         },
//!     )
//!     .await?;
//!
//! println!("Triggered: {}", pipeline.web_url);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod pipelines;
mod service;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use service::PipelineService;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the CI host API
///
/// Covers the two operations the trigger workflow needs:
/// - `POST` the trigger endpoint to create a pipeline run
/// - `GET` a pipeline to refresh its status
#[derive(Debug, Clone)]
pub struct GitlabClient {
    /// Base URL of the host (e.g., "https://salsa.debian.org")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl GitlabClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the host (e.g., "https://salsa.debian.org")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the host
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Encode a project identifier for use as a URL path segment
    ///
    /// A project may be addressed by numeric id ("4500") or namespace path
    /// ("salsa-ci-team/pipeline"); the path form needs its slashes encoded.
    pub(crate) fn project_path(project: &str) -> String {
        project.replace('/', "%2F")
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitlabClient::new("https://salsa.debian.org");
        assert_eq!(client.base_url(), "https://salsa.debian.org");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GitlabClient::new("https://salsa.debian.org/");
        assert_eq!(client.base_url(), "https://salsa.debian.org");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = GitlabClient::with_client("https://salsa.debian.org", http_client);
        assert_eq!(client.base_url(), "https://salsa.debian.org");
    }

    #[test]
    fn test_project_path_encodes_namespace() {
        assert_eq!(GitlabClient::project_path("4500"), "4500");
        assert_eq!(
            GitlabClient::project_path("salsa-ci-team/pipeline"),
            "salsa-ci-team%2Fpipeline"
        );
    }
}
