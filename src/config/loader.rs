//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables the hosting platform uses for provider secrets.
const ENV_CONVERTKIT_API_KEY: &str = "CONVERTKIT_API_KEY";
const ENV_CONVERTKIT_FORM_ID: &str = "CONVERTKIT_FORM_ID";
const ENV_MAILCHIMP_API_KEY: &str = "MAILCHIMP_API_KEY";
const ENV_MAILCHIMP_SERVER_PREFIX: &str = "MAILCHIMP_SERVER_PREFIX";
const ENV_MAILCHIMP_LIST_ID: &str = "MAILCHIMP_LIST_ID";

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    finish(config)
}

/// Load from `path` when given, otherwise start from defaults.
///
/// Provider secrets from the environment are applied in both cases.
pub fn load_or_default(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => finish(SiteConfig::default()),
    }
}

fn finish(mut config: SiteConfig) -> Result<SiteConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overwrite provider secrets with non-empty values from `lookup`.
pub fn apply_env_overrides<F>(config: &mut SiteConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let newsletter = &mut config.newsletter;
    let targets: [(&str, &mut String); 5] = [
        (ENV_CONVERTKIT_API_KEY, &mut newsletter.convertkit.api_key),
        (ENV_CONVERTKIT_FORM_ID, &mut newsletter.convertkit.form_id),
        (ENV_MAILCHIMP_API_KEY, &mut newsletter.mailchimp.api_key),
        (ENV_MAILCHIMP_SERVER_PREFIX, &mut newsletter.mailchimp.server_prefix),
        (ENV_MAILCHIMP_LIST_ID, &mut newsletter.mailchimp.list_id),
    ];

    for (key, slot) in targets {
        if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
            *slot = value;
        }
    }
}
