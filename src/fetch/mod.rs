mod auth;
mod basic;
mod client;
mod feeds;

pub use auth::{ApiKey, MTA_API_KEY_HEADER};
pub use basic::BasicClient;
pub use client::HttpClient;
pub use feeds::{FeedSelector, MTA_FEED_BASE_URL, feed_suffix_for_legacy_id, feed_suffix_for_route};

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Wait before the first retry; later retries wait proportionally longer.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Fetches `url`, retrying transport failures and non-success statuses up to
/// `retries` more times.
#[tracing::instrument(skip(client))]
pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
    retries: u32,
) -> Result<Bytes> {
    let mut attempt = 0;
    loop {
        match fetch_once(client, url).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), attempt, "Feed bytes received");
                return Ok(bytes);
            }
            Err(e) if attempt < retries && is_retryable(&e) => {
                attempt += 1;
                warn!(error = %e, attempt, retries, "Feed fetch failed, retrying");
                tokio::time::sleep(RETRY_DELAY * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn fetch_once<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Bytes> {
    let parsed = reqwest::Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    Ok(resp.bytes().await?)
}

fn is_retryable(error: &Error) -> bool {
    matches!(error, Error::Transport(_) | Error::HttpStatus { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts requests and never answers.
    #[derive(Default)]
    struct Unreachable {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpClient for Unreachable {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            unreachable!("request should not be sent")
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_not_requested() {
        let client = Unreachable::default();
        let result = fetch_bytes(&client, "not a url", 3).await;

        assert!(matches!(result, Err(Error::InvalidUrl(_))));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_retry_policy() {
        assert!(!is_retryable(&Error::InvalidUrl("x".into())));
        assert!(!is_retryable(&Error::UnknownFeed("x".into())));
        assert!(is_retryable(&Error::HttpStatus {
            url: "http://localhost".into(),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        }));
    }
}
