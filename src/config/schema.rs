//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the site edge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Static asset directory settings.
    pub assets: AssetsConfig,

    /// Trailing-slash normalization rules.
    pub normalize: NormalizeConfig,

    /// Newsletter relay settings.
    pub newsletter: NewsletterConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where the pre-built site lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Root directory of the generated site.
    pub root: String,

    /// Page served (with status 404) when nothing else matches,
    /// relative to `root`.
    pub not_found_page: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "dist".to_string(),
            not_found_page: "404.html".to_string(),
        }
    }
}

/// Trailing-slash normalization rules.
///
/// The three skip rules are independent: any match passes the request
/// through untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Turn the filter off entirely.
    pub enabled: bool,

    /// Skip paths whose last segment looks like `name.ext`.
    pub skip_extensions: bool,

    /// Prefix of host-internal paths (`/_headers`, `/_redirects`, ...).
    pub internal_prefix: String,

    /// Prefix claimed by the API routing layer.
    pub api_prefix: String,

    /// Scheme used for absolute `Location` headers when neither the request
    /// URI nor `X-Forwarded-Proto` carries one.
    pub default_scheme: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_extensions: true,
            internal_prefix: "/_".to_string(),
            api_prefix: "/api/".to_string(),
            default_scheme: "http".to_string(),
        }
    }
}

/// Email provider the newsletter relay forwards to.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Record the signup in the log only.
    #[default]
    Log,
    ConvertKit,
    Mailchimp,
}

/// Newsletter relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NewsletterConfig {
    pub provider: ProviderKind,

    pub convertkit: ConvertKitConfig,

    pub mailchimp: MailchimpConfig,
}

/// ConvertKit form subscription settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConvertKitConfig {
    pub api_key: String,
    pub form_id: String,

    /// API origin, overridable for testing.
    pub base_url: String,
}

impl Default for ConvertKitConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            form_id: String::new(),
            base_url: "https://api.convertkit.com".to_string(),
        }
    }
}

/// Mailchimp list membership settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MailchimpConfig {
    pub api_key: String,

    /// Data center prefix, e.g. "us1".
    pub server_prefix: String,

    pub list_id: String,

    /// API origin override. Derived from `server_prefix` when unset.
    pub base_url: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Timeout for the single call to the email provider in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
