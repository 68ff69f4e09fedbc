use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use ukprice_core::SourceConfig;

use crate::error::ScraperError;
use crate::rate_limit::RetryPolicy;
use crate::types::StoreProduct;

/// HTTP client for the WooCommerce Store API product search endpoint.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient errors (429, network failures) are
/// automatically retried with exponential backoff.
pub struct SearchClient {
    client: Client,
    retry: RetryPolicy,
}

/// Extracts the scheme+host origin from a source base URL.
///
/// Given `"https://www.cgarsltd.co.uk/cigars/"`, returns
/// `"https://www.cgarsltd.co.uk"`. The Store API always hangs off the site
/// root regardless of any path in the configured URL.
pub(crate) fn extract_store_origin(base_url: &str) -> String {
    reqwest::Url::parse(base_url).map_or_else(
        |_| {
            // fallback: take "https://host" by splitting on '/' and taking first 3 parts
            base_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

impl SearchClient {
    /// Creates a `SearchClient` with configured timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors; `0` disables retries.
    /// `backoff_base_secs` controls the base delay for exponential backoff:
    /// the wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            retry: RetryPolicy {
                max_retries,
                base_secs: backoff_base_secs,
            },
        })
    }

    /// Runs one product search against a source, with automatic retry on
    /// transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status (not retried).
    /// - [`ScraperError::Http`] — network or TLS failure after all retries exhausted.
    /// - [`ScraperError::Deserialize`] — response body is not valid JSON or
    ///   does not match the expected shape (not retried).
    pub async fn search(
        &self,
        source: &SourceConfig,
        term: &str,
        per_page: u32,
    ) -> Result<Vec<StoreProduct>, ScraperError> {
        let url = Self::search_url(&source.base_url, term, per_page);
        let domain = extract_domain(&source.base_url);

        self.retry
            .run(|| {
                let url = url.clone();
                let domain = domain.clone();
                async move {
                    let response = self.client.get(&url).send().await?;
                    let status = response.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after_secs = response
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(60);

                        return Err(ScraperError::RateLimited {
                            domain,
                            retry_after_secs,
                        });
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(ScraperError::NotFound { url });
                    }

                    if !status.is_success() {
                        return Err(ScraperError::UnexpectedStatus {
                            status: status.as_u16(),
                            url,
                        });
                    }

                    let body = response.text().await?;
                    serde_json::from_str::<Vec<StoreProduct>>(&body).map_err(|e| {
                        ScraperError::Deserialize {
                            context: format!("product search from {domain}"),
                            source: e,
                        }
                    })
                }
            })
            .await
    }

    /// Builds the Store API search URL for a source, query term, and page
    /// size.
    ///
    /// Uses [`extract_store_origin`] to strip any path from the configured
    /// base URL. The term is URL-encoded via `reqwest::Url` when the origin
    /// parses, and percent-encoded manually as a last resort otherwise.
    fn search_url(base_url: &str, term: &str, per_page: u32) -> String {
        let origin = extract_store_origin(base_url);
        let endpoint = format!("{origin}/wp-json/wc/store/v1/products");
        if let Ok(mut url) = reqwest::Url::parse(&endpoint) {
            url.query_pairs_mut()
                .append_pair("search", term)
                .append_pair("per_page", &per_page.to_string());
            url.to_string()
        } else {
            tracing::warn!(
                base_url,
                "source origin is not a valid URL base; percent-encoding term manually"
            );
            let encoded = utf8_percent_encode(term, NON_ALPHANUMERIC);
            format!("{endpoint}?search={encoded}&per_page={per_page}")
        }
    }
}

/// Extracts the hostname from a base URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
fn extract_domain(base_url: &str) -> String {
    let without_scheme = base_url
        .strip_prefix("https://")
        .or_else(|| base_url.strip_prefix("http://"))
        .unwrap_or(base_url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(base_url)
        .to_owned()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
