use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, StatusCode};
use serde_json::Value as JsonValue;
use tokio::time::sleep;

use crate::{
    cache::CacheKey,
    decode::{decode_json, decode_quote, decode_quote_list, decode_quote_page},
    retry::{RetryDecision, RetryState},
    ClientOptions, Endpoint, Params, Quote, QuoteError, QuotePage, ResponseCache, Result,
};

/// Public Animechan API root.
pub const DEFAULT_BASE_URL: &str = "https://api.animechan.io/v1";

/// Lifetime of cached responses for a client built with default settings.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
/// HTTP client for the Animechan quote API.
///
/// Cloning is cheap; clones share the connection pool and the response cache.
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    options: ClientOptions,
    cache: Option<Arc<ResponseCache>>,
}

impl fmt::Debug for QuoteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("options", &self.options)
            .field("cache_entries", &self.cache.as_ref().map(|cache| cache.len()))
            .finish()
    }
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteClient {
    /// Creates a client for the public API with default options and a
    /// five-minute response cache.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom API root, e.g. a local mock server.
    ///
    /// A trailing `/` is removed so endpoint paths can be appended directly.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
            api_key: None,
            options: ClientOptions::default(),
            cache: Some(Arc::new(ResponseCache::with_ttl(DEFAULT_CACHE_TTL))),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads (both optional):
    /// - `ANIMECHAN_BASE_URL`: API root, defaults to [`DEFAULT_BASE_URL`]
    /// - `ANIMECHAN_API_KEY`: sent as the `x-api-key` header
    ///
    /// Returns an error if a variable is set but empty.
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_url = match std::env::var("ANIMECHAN_BASE_URL") {
            Ok(url) if url.trim().is_empty() => {
                return Err("ANIMECHAN_BASE_URL is set but empty".to_owned())
            }
            Ok(url) => url,
            Err(_) => DEFAULT_BASE_URL.to_owned(),
        };
        let mut client = Self::with_base_url(base_url.trim());

        if let Ok(key) = std::env::var("ANIMECHAN_API_KEY") {
            if key.trim().is_empty() {
                return Err("ANIMECHAN_API_KEY is set but empty".to_owned());
            }
            client = client.with_api_key(key.trim());
        }
        Ok(client)
    }

    /// Points an already configured client at another API root, keeping its
    /// API key, options and cache.
    pub fn override_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(base_url.into());
        self
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Sends `key` in the `x-api-key` header of every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Uses an externally constructed cache, possibly shared with other clients.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Disables response caching; every fetch goes to the network.
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The cache this client reads from and writes to, if caching is enabled.
    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Fetches a random quote.
    pub async fn random_quote(&self) -> Result<Quote> {
        self.fetch_with(Endpoint::RandomQuote, (), decode_quote).await
    }

    /// Fetches quotes said by `character`.
    pub async fn quotes_by_character(&self, character: &str, limit: Option<u32>) -> Result<Vec<Quote>> {
        let params = Params::new()
            .with("character", character)
            .with_opt("limit", limit);
        self.fetch_with(Endpoint::Quotes, params, decode_quote_list).await
    }

    /// Fetches quotes from the anime titled `title`.
    pub async fn quotes_by_show(&self, title: &str, limit: Option<u32>) -> Result<Vec<Quote>> {
        let params = Params::new().with("title", title).with_opt("limit", limit);
        self.fetch_with(Endpoint::Quotes, params, decode_quote_list).await
    }

    /// Fetches one page of the unfiltered quote listing, keeping the
    /// envelope's pagination fields in [`QuotePage::meta`].
    pub async fn quotes_page(&self, page: u32) -> Result<QuotePage> {
        let params = Params::new().with("page", page);
        self.fetch_with(Endpoint::Quotes, params, decode_quote_page).await
    }

    /// Fetches `endpoint` with `params` and returns the decoded JSON payload.
    ///
    /// A fresh cached response for the same signature is returned without any
    /// network traffic. Otherwise the request is attempted up to
    /// [`ClientOptions::max_attempts`] times; retriable failures are separated
    /// by exponential backoff, or by the server's `Retry-After` hint on `429`.
    /// A hint is honored up to [`ClientOptions::max_retry_after_ms`] and
    /// clamped beyond that. When every attempt fails, the error is
    /// [`QuoteError::RetryExhausted`] wrapping the last failure. Non-retriable
    /// failures are returned as is.
    pub async fn fetch<P: Into<Params>>(&self, endpoint: Endpoint, params: P) -> Result<JsonValue> {
        self.fetch_with(endpoint, params, Ok).await
    }

    /// [`fetch`](Self::fetch) with a shape check: a payload is only cached
    /// once `decode` accepts it.
    async fn fetch_with<T, P, F>(&self, endpoint: Endpoint, params: P, decode: F) -> Result<T>
    where
        P: Into<Params>,
        F: Fn(JsonValue) -> Result<T>,
    {
        let params = params.into();
        let key = CacheKey::new(endpoint, &params);

        if let Some(payload) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            return decode(payload);
        }

        let mut retry = RetryState::new(self.options.retry_policy());
        loop {
            let _attempt = retry.begin_attempt();

            let failure = match self.send_once(endpoint, &params).await {
                Ok(payload) => {
                    let decoded = decode(payload.clone())?;
                    if let Some(cache) = &self.cache {
                        cache.insert(key, payload);
                    }
                    if self.options.pacing_ms > 0 {
                        sleep(Duration::from_millis(self.options.pacing_ms)).await;
                    }
                    return Ok(decoded);
                }
                Err(err) => err,
            };

            match retry.on_failure(&failure) {
                RetryDecision::Wait(delay) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt = _attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure,
                        "request failed, retrying"
                    );
                    sleep(delay).await;
                }
                RetryDecision::Abort => return Err(failure),
                RetryDecision::Exhausted => {
                    return Err(QuoteError::RetryExhausted {
                        attempts: retry.attempts(),
                        last: Box::new(failure),
                    })
                }
            }
        }
    }

    async fn send_once(&self, endpoint: Endpoint, params: &Params) -> Result<JsonValue> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let mut request = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&params.query_pairs())
            .timeout(Duration::from_millis(self.options.timeout_ms));
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(QuoteError::Transport)?;
        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.map_err(QuoteError::Transport)?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(QuoteError::Http {
                status: status.as_u16(),
                body,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint = %endpoint, status = status.as_u16(), "fetched");

        decode_json(&body)
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim().trim_end_matches('/').to_owned()
}

/// Reads a `Retry-After` header given in seconds.
///
/// Decimal values are accepted; HTTP-date values and negative or non-finite
/// numbers are ignored.
fn parse_retry_after(headers: &header::HeaderMap) -> Option<Duration> {
    let raw = headers.get(header::RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    Duration::try_from_secs_f64(raw.parse::<f64>().ok()?).ok()
}
