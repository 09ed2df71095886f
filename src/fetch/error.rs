use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream source throttled the request. Callers stop issuing
    /// further fetches for the current pass when they see this.
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// Non-rate-limit error payload reported by the upstream source.
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited(_))
    }
}
