//! Run configuration
//!
//! Resolves CLI arguments and CI environment defaults into the settings the
//! trigger workflow needs. Everything is validated here, before any remote
//! call is made.

use std::time::Duration;

use anyhow::Result;

/// Settings for one invocation of the trigger-and-wait workflow
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CI host (e.g., "https://salsa.debian.org")
    pub gitlab_url: String,

    /// Numeric id or namespace path of the target project
    pub project: String,

    /// Pipeline trigger token
    pub token: String,

    /// Branch or tag to trigger
    pub reference: String,

    /// Release labels; one pipeline run is triggered per label
    pub releases: Vec<String>,

    /// Extra KEY=VALUE variables passed on the command line
    pub env: Vec<(String, String)>,

    /// Whether to compute the staging image URL variables
    pub include_image_urls: bool,

    /// Registry root for the staging images
    pub registry_url: Option<String>,

    /// Default branch, to tell staging branches from the mainline
    pub default_branch: Option<String>,

    /// Tag suffix for the staging images
    pub staging_tag: Option<String>,

    /// How often to poll a triggered run's status
    pub poll_interval: Duration,

    /// Optional upper bound on how long to wait for a single run
    pub wait_timeout: Option<Duration>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project.is_empty() {
            anyhow::bail!("project id cannot be empty");
        }

        if self.token.is_empty() {
            anyhow::bail!("trigger token cannot be empty");
        }

        if self.reference.is_empty() {
            anyhow::bail!("reference cannot be empty");
        }

        if self.releases.is_empty() {
            anyhow::bail!("at least one release label is required (--release or $RELEASE)");
        }

        if self.releases.iter().any(|release| release.is_empty()) {
            anyhow::bail!("release labels cannot be empty");
        }

        if !self.gitlab_url.starts_with("http://") && !self.gitlab_url.starts_with("https://") {
            anyhow::bail!("gitlab url must start with http:// or https://");
        }

        if self.poll_interval.as_secs() == 0 {
            anyhow::bail!("poll interval must be greater than 0");
        }

        if self.include_image_urls {
            for (value, flag) in [
                (&self.registry_url, "--registry-url"),
                (&self.default_branch, "--default-branch"),
                (&self.staging_tag, "--staging-tag"),
            ] {
                if value.as_deref().is_none_or(str::is_empty) {
                    anyhow::bail!("{} is required with --include-image-urls", flag);
                }
            }
        }

        Ok(())
    }
}

/// Resolve the CI host URL from the flag value or the CI environment
///
/// The CI environment exposes the bare host name, not a URL, so the
/// fallback assumes https.
pub fn resolve_gitlab_url(flag: Option<String>, server_host: Option<String>) -> Result<String> {
    if let Some(url) = flag {
        return Ok(url);
    }

    match server_host {
        Some(host) if !host.is_empty() => Ok(format!("https://{}", host)),
        _ => anyhow::bail!("no CI host: pass --gitlab-url or set CI_SERVER_HOST"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            gitlab_url: "https://salsa.debian.org".to_string(),
            project: "4500".to_string(),
            token: "glptt-secret".to_string(),
            reference: "debian/unstable".to_string(),
            releases: vec!["unstable".to_string()],
            env: Vec::new(),
            include_image_urls: false,
            registry_url: None,
            default_branch: None,
            staging_tag: None,
            poll_interval: Duration::from_secs(10),
            wait_timeout: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_releases_fail() {
        let mut config = valid_config();
        config.releases.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_url_fails() {
        let mut config = valid_config();
        config.gitlab_url = "salsa.debian.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_poll_interval_fails() {
        let mut config = valid_config();
        config.poll_interval = Duration::from_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_image_urls_require_registry_settings() {
        let mut config = valid_config();
        config.include_image_urls = true;
        assert!(config.validate().is_err());

        config.registry_url = Some("registry.salsa.debian.org/group/project".to_string());
        config.default_branch = Some("master".to_string());
        config.staging_tag = Some("debian/unstable".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_gitlab_url_prefers_flag() {
        let url = resolve_gitlab_url(
            Some("https://gitlab.example.org".to_string()),
            Some("salsa.debian.org".to_string()),
        )
        .unwrap();
        assert_eq!(url, "https://gitlab.example.org");
    }

    #[test]
    fn test_resolve_gitlab_url_falls_back_to_host() {
        let url = resolve_gitlab_url(None, Some("salsa.debian.org".to_string())).unwrap();
        assert_eq!(url, "https://salsa.debian.org");
    }

    #[test]
    fn test_resolve_gitlab_url_requires_a_source() {
        assert!(resolve_gitlab_url(None, None).is_err());
        assert!(resolve_gitlab_url(None, Some(String::new())).is_err());
    }
}
