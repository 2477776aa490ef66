//! Variable construction for triggered child pipelines
//!
//! Every triggered run carries a marker identifying it as a child run, the
//! release label it was triggered for, and any command-line overrides.
//! When triggering from a staging branch it also carries the URLs of the
//! staging images built for that branch.

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::info;

use crate::config::Config;

/// Staging images published by the pipeline, as (variable suffix, registry
/// path) pairs.
const STAGING_IMAGES: &[(&str, &str)] = &[
    // amd64 images
    ("APTLY", "aptly"),
    ("AUTOPKGTEST", "autopkgtest"),
    ("BASE", "base"),
    ("GENERIC_TESTS", "generic_tests"),
    ("BLHC", "blhc"),
    ("GBP", "gbp"),
    ("LINTIAN", "lintian"),
    ("PIUPARTS", "piuparts"),
    ("REPROTEST", "reprotest"),
    // i386 images
    ("BASE_I386", "i386/base"),
];

/// Parse a single key=value pair
///
/// Used as the clap value parser for `-e`, so malformed overrides are
/// rejected at argument-parsing time.
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Build the variable set for one triggered run
///
/// Later sources win: an explicit `-e RELEASE=...` override replaces the
/// derived release value.
pub fn build_variables(config: &Config, release: &str) -> BTreeMap<String, String> {
    let mut variables = BTreeMap::new();
    variables.insert("IS_A_CHILD_PIPELINE".to_string(), "true".to_string());
    variables.insert("RELEASE".to_string(), release.to_string());

    for (key, value) in &config.env {
        variables.insert(key.clone(), value.clone());
    }

    if config.include_image_urls {
        let default_branch = config.default_branch.as_deref().unwrap_or_default();
        info!(
            "Current branch: {}. Default branch: {}",
            config.reference, default_branch
        );

        if config.reference == default_branch {
            info!("Running on default branch. Not including image urls.");
        } else {
            let registry_url = config.registry_url.as_deref().unwrap_or_default();
            let staging_tag = config.staging_tag.as_deref().unwrap_or_default();
            variables.extend(staging_image_urls(registry_url, release, staging_tag));
        }
    }

    variables
}

/// Variables pointing each job at the staging images built for `release`
fn staging_image_urls(
    registry_url: &str,
    release: &str,
    staging_tag: &str,
) -> BTreeMap<String, String> {
    STAGING_IMAGES
        .iter()
        .map(|(name, path)| {
            (
                format!("SALSA_CI_IMAGES_{}", name),
                format!("{}/{}:{}_{}", registry_url, path, release, staging_tag),
            )
        })
        .collect()
}
