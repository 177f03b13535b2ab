//! The INSPIRE-HEP API client.

use crate::error::{InspireError, Result};
use crate::rate_limit::{RateLimiter, DEFAULT_REQUESTS_PER_SECOND};
use reqwest::Client;
use std::time::Duration;

/// Public INSPIRE REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://inspirehep.net/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Async client for the INSPIRE-HEP API.
///
/// INSPIRE needs no credentials, so [`InspireClient::new`] is ready to use.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> inspire_client::error::Result<()> {
/// use inspire_client::{InspireClient, Record};
///
/// let client = InspireClient::new();
/// let record = Record::fetch(&client, "Weinberg:1967tq").await?;
/// println!("{}", record.display()?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InspireClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) rate_limiter: RateLimiter,
}

impl InspireClient {
    /// Create a client for the public INSPIRE instance.
    pub fn new() -> Self {
        Self {
            http: build_http(DEFAULT_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limiter: RateLimiter::new(DEFAULT_REQUESTS_PER_SECOND),
        }
    }

    /// Create a client configured from the environment.
    ///
    /// `INSPIRE_BASE_URL` overrides the endpoint and `INSPIRE_RATE_LIMIT` the
    /// number of requests per second. Both are optional.
    pub fn from_env() -> Result<Self> {
        let mut client = Self::new();

        if let Ok(url) = std::env::var("INSPIRE_BASE_URL") {
            if !url.is_empty() {
                client = client.with_base_url(url);
            }
        }

        if let Ok(rate) = std::env::var("INSPIRE_RATE_LIMIT") {
            let per_second: f64 = rate.parse().map_err(|_| {
                InspireError::Config(format!("INSPIRE_RATE_LIMIT is not a number: {}", rate))
            })?;
            if per_second <= 0.0 {
                return Err(InspireError::Config(
                    "INSPIRE_RATE_LIMIT must be positive".to_string(),
                ));
            }
            client = client.with_rate_limit(per_second);
        }

        Ok(client)
    }

    /// Override the base URL (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the rate limit (requests per second).
    pub fn with_rate_limit(mut self, per_second: f64) -> Self {
        self.rate_limiter = RateLimiter::new(per_second);
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = build_http(timeout);
        self
    }

    /// The endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request to the INSPIRE API and return the body.
    pub(crate) async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, ?params, "INSPIRE request");

        let response = self
            .http
            .get(&url)
            .header("User-Agent", concat!("inspire-client/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await?;

        let result = handle_response(response).await;
        if let Err(InspireError::RateLimited {
            retry_after: Some(wait),
        }) = &result
        {
            self.rate_limiter.pause_for(*wait).await;
        }
        result
    }
}

impl Default for InspireClient {
    fn default() -> Self {
        Self::new()
    }
}

fn build_http(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Handle the HTTP response, mapping status codes to errors.
///
/// Every non-2xx status is a transport-level failure; an empty result set is
/// reported as [`InspireError::NotFound`] by the callers that expect hits.
async fn handle_response(response: reqwest::Response) -> Result<String> {
    let status = response.status().as_u16();

    match status {
        200..=299 => Ok(response.text().await?),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            tracing::warn!(?retry_after, "INSPIRE rate limit hit");
            Err(InspireError::RateLimited { retry_after })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(InspireError::Api {
                status,
                message: body,
            })
        }
    }
}
