//! Email provider clients.
//!
//! # Responsibilities
//! - Build the provider endpoint from configuration
//! - Make exactly one upstream call per signup
//! - Turn non-success replies into [`RelayError::Rejected`] with the
//!   provider's own explanation, for the logs
//!
//! # Design Decisions
//! - No retries: a failed call is reported to the visitor, who can resubmit
//! - One shared reqwest client with a hard timeout

use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client, Response};
use serde::Serialize;
use url::Url;

use crate::config::{NewsletterConfig, ProviderKind};
use crate::config::schema::{ConvertKitConfig, MailchimpConfig};
use crate::newsletter::error::{RelayError, RelayResult};

/// The configured destination for newsletter signups.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Write the signup to the log and succeed.
    Log,
    ConvertKit(ConvertKit),
    Mailchimp(Mailchimp),
}

impl Provider {
    /// Build the provider selected in `config`.
    pub fn from_config(config: &NewsletterConfig, timeout: Duration) -> RelayResult<Self> {
        match config.provider {
            ProviderKind::Log => Ok(Self::Log),
            ProviderKind::ConvertKit => {
                Ok(Self::ConvertKit(ConvertKit::new(&config.convertkit, client(timeout)?)?))
            }
            ProviderKind::Mailchimp => {
                Ok(Self::Mailchimp(Mailchimp::new(&config.mailchimp, client(timeout)?)?))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::ConvertKit(_) => "convertkit",
            Self::Mailchimp(_) => "mailchimp",
        }
    }

    /// Subscribe `email`. Makes at most one network call.
    pub async fn subscribe(&self, email: &str) -> RelayResult<()> {
        match self {
            Self::Log => {
                tracing::info!(email = %email, "Newsletter signup");
                Ok(())
            }
            Self::ConvertKit(ck) => ck.subscribe(email).await,
            Self::Mailchimp(mc) => mc.subscribe(email).await,
        }
    }
}

fn client(timeout: Duration) -> RelayResult<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Append `segments` to the path of `base`.
fn endpoint(base: &str, segments: &[&str]) -> RelayResult<Url> {
    let mut url = Url::parse(base).map_err(|e| RelayError::Endpoint(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| RelayError::Endpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// ConvertKit form subscription (`POST /v3/forms/{id}/subscribe`).
#[derive(Debug, Clone)]
pub struct ConvertKit {
    client: Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Serialize)]
struct ConvertKitBody<'a> {
    api_key: &'a str,
    email: &'a str,
}

impl ConvertKit {
    pub fn new(config: &ConvertKitConfig, client: Client) -> RelayResult<Self> {
        let endpoint = endpoint(
            &config.base_url,
            &["v3", "forms", config.form_id.as_str(), "subscribe"],
        )?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn subscribe(&self, email: &str) -> RelayResult<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ConvertKitBody {
                api_key: &self.api_key,
                email,
            })
            .send()
            .await?;
        check(response).await
    }
}

/// Mailchimp list membership (`POST /3.0/lists/{id}/members`).
#[derive(Debug, Clone)]
pub struct Mailchimp {
    client: Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Serialize)]
struct MailchimpBody<'a> {
    email_address: &'a str,
    status: &'static str,
}

impl Mailchimp {
    pub fn new(config: &MailchimpConfig, client: Client) -> RelayResult<Self> {
        let base = match &config.base_url {
            Some(base) => base.clone(),
            None => format!("https://{}.api.mailchimp.com", config.server_prefix),
        };
        let endpoint = endpoint(&base, &["3.0", "lists", config.list_id.as_str(), "members"])?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn subscribe(&self, email: &str) -> RelayResult<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("apikey {}", self.api_key))
            .json(&MailchimpBody {
                email_address: email,
                status: "subscribed",
            })
            .send()
            .await?;
        check(response).await
    }
}

/// Map a provider reply to success or [`RelayError::Rejected`].
async fn check(response: Response) -> RelayResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let text = response.text().await.unwrap_or_default();
    Err(RelayError::Rejected {
        status: status.as_u16(),
        detail: error_detail(&text),
    })
}

/// Pull a human-readable reason out of a provider error body.
fn error_detail(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    parsed
        .as_ref()
        .and_then(|v| ["detail", "message", "error"].iter().find_map(|k| v.get(*k)?.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| "Failed to subscribe".to_string())
}
