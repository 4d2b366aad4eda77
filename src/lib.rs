//! `animechan-http` is an async HTTP client for the Animechan quote API.
//!
//! Every request goes through [`QuoteClient::fetch`], which
//! - serves repeated identical requests from a [`ResponseCache`],
//! - retries network failures, `429` and `5xx` responses with exponential
//!   backoff (honoring `Retry-After` on `429`),
//! - gives up with [`QuoteError::RetryExhausted`] once the attempt budget in
//!   [`ClientOptions`] is spent.
//!
//! Typed helpers sit on top: [`QuoteClient::random_quote`],
//! [`QuoteClient::quotes_by_character`], [`QuoteClient::quotes_by_show`] and
//! [`QuoteClient::quotes_page`]. The [`collect`] module gathers quotes in bulk
//! for the `animechan` command-line tool.

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
mod client;
pub mod collect;
mod decode;
mod error;
mod options;
mod params;
pub mod retry;
mod types;
mod value;
mod wire;

pub use cache::{CacheKey, ResponseCache};
pub use client::{QuoteClient, DEFAULT_BASE_URL, DEFAULT_CACHE_TTL};
pub use error::QuoteError;
pub use options::ClientOptions;
pub use params::Params;
pub use retry::{RetryDecision, RetryPolicy, RetryState};
pub use types::{Endpoint, Quote, QuotePage, UnknownEndpoint};
pub use value::Value;

pub type Result<T> = std::result::Result<T, QuoteError>;
