use super::client::HttpClient;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// Header the MTA developer portal expects the key in.
pub const MTA_API_KEY_HEADER: &str = "x-api-key";

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// The header is validated once, at construction, so every request built
/// through the wrapper carries it.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    key: HeaderValue,
}

impl<C> ApiKey<C> {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `header_name` or `key` cannot be used in
    /// an HTTP header.
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .map_err(|_| Error::Config(format!("'{header_name}' is not a valid header name")))?;
        let mut key = HeaderValue::from_str(key)
            .map_err(|_| Error::Config("API key contains invalid header characters".to_string()))?;
        key.set_sensitive(true);

        Ok(Self {
            inner,
            header_name,
            key,
        })
    }

    /// Uses the `x-api-key` header.
    pub fn mta(inner: C, key: &str) -> Result<Self> {
        Self::new(inner, MTA_API_KEY_HEADER, key)
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.key.clone());
        self.inner.execute(req).await
    }
}
