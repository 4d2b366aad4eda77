use std::time::Duration;

use reqwest::StatusCode;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// The service answered `429 Too Many Requests`.
    #[error("rate limited{}", retry_after_suffix(.retry_after))]
    RateLimited {
        /// Wait requested by the server through `Retry-After`, if any.
        retry_after: Option<Duration>,
    },
    /// Every allowed attempt failed with a retriable error.
    #[error("gave up after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Number of attempts made, including the first one.
        attempts: usize,
        /// Failure observed on the final attempt.
        last: Box<QuoteError>,
    },
    /// Response decoding or payload-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
}

impl QuoteError {
    /// Whether another attempt may succeed where this one failed.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Transport(err) => {
                !err.is_builder()
                    && (err.is_timeout() || err.is_connect() || err.is_request() || err.is_body())
            }
            Self::Http { status, .. } => StatusCode::from_u16(*status)
                .map(is_retriable_status)
                .unwrap_or(false),
            Self::RateLimited { .. } => true,
            Self::RetryExhausted { .. } | Self::Decode(_) => false,
        }
    }

    /// Server-provided wait hint, only present for rate-limit failures.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Short label used when reporting failures.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "network",
            Self::Http { .. } => "http",
            Self::RateLimited { .. } => "rate-limit",
            Self::RetryExhausted { .. } => "retry-exhausted",
            Self::Decode(_) => "decode",
        }
    }
}

pub(crate) fn is_retriable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn retry_after_suffix(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(" (retry after {:.3}s)", wait.as_secs_f64()),
        None => String::new(),
    }
}
