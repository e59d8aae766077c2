//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that the selected newsletter provider is fully configured
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ProviderKind, SiteConfig};

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{field} must start with '/' (got '{value}')")]
    RelativePrefix { field: &'static str, value: String },

    #[error("normalize.default_scheme must be http or https (got '{0}')")]
    UnsupportedScheme(String),

    #[error("assets.root must not be empty")]
    EmptyAssetRoot,

    #[error("newsletter provider '{provider}' requires {field}")]
    MissingProviderSetting {
        provider: &'static str,
        field: &'static str,
    },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.upstream_secs"));
    }

    if config.assets.root.trim().is_empty() {
        errors.push(ValidationError::EmptyAssetRoot);
    }

    for (field, value) in [
        ("normalize.internal_prefix", &config.normalize.internal_prefix),
        ("normalize.api_prefix", &config.normalize.api_prefix),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativePrefix {
                field,
                value: value.clone(),
            });
        }
    }

    if !matches!(config.normalize.default_scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::UnsupportedScheme(
            config.normalize.default_scheme.clone(),
        ));
    }

    validate_provider(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_provider(config: &SiteConfig, errors: &mut Vec<ValidationError>) {
    let newsletter = &config.newsletter;
    match newsletter.provider {
        ProviderKind::Log => {}
        ProviderKind::ConvertKit => {
            let ck = &newsletter.convertkit;
            require(errors, "convertkit", "newsletter.convertkit.api_key", &ck.api_key);
            require(errors, "convertkit", "newsletter.convertkit.form_id", &ck.form_id);
            if url::Url::parse(&ck.base_url).is_err() {
                errors.push(ValidationError::InvalidUrl {
                    field: "newsletter.convertkit.base_url",
                    value: ck.base_url.clone(),
                });
            }
        }
        ProviderKind::Mailchimp => {
            let mc = &newsletter.mailchimp;
            require(errors, "mailchimp", "newsletter.mailchimp.api_key", &mc.api_key);
            require(errors, "mailchimp", "newsletter.mailchimp.list_id", &mc.list_id);
            match &mc.base_url {
                Some(base) => {
                    if url::Url::parse(base).is_err() {
                        errors.push(ValidationError::InvalidUrl {
                            field: "newsletter.mailchimp.base_url",
                            value: base.clone(),
                        });
                    }
                }
                None => require(
                    errors,
                    "mailchimp",
                    "newsletter.mailchimp.server_prefix",
                    &mc.server_prefix,
                ),
            }
        }
    }
}

fn require(
    errors: &mut Vec<ValidationError>,
    provider: &'static str,
    field: &'static str,
    value: &str,
) {
    if value.trim().is_empty() {
        errors.push(ValidationError::MissingProviderSetting { provider, field });
    }
}
