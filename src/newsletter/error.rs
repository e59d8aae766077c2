use thiserror::Error;

/// Errors from relaying a signup to the email provider.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Could not reach the provider or read its reply.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("provider rejected subscription ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Provider endpoint could not be built from configuration.
    #[error("invalid provider endpoint '{0}'")]
    Endpoint(String),
}

pub type RelayResult<T> = Result<T, RelayError>;
