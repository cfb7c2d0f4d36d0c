//! Authenticated HTTP access to the API with rate-limit handling

use crate::auth::Authenticator;
use crate::config::NetworkConfig;
use crate::error::{HealthError, Result};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct ApiClient {
    inner: Client,
    rate_limit_delay: Duration,
}

impl ApiClient {
    /// Build a client that sends `auth` on every request
    pub fn new(auth: &Authenticator, config: &NetworkConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut token = header::HeaderValue::from_str(&auth.header_value())
            .map_err(|_| HealthError::config("API token contains characters not allowed in a header"))?;
        token.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, token);

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build()?;

        Ok(Self {
            inner,
            rate_limit_delay: config.rate_limit_delay(),
        })
    }

    /// GET `url` and decode the JSON body.
    ///
    /// A 429 response sleeps for the configured delay and retries the same
    /// URL, with no limit on attempts. Any other non-200 status fails at once.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            debug!("GET {} (attempt {})", url, attempts);
            let response = self.inner.get(url).send().await?;

            match response.status() {
                StatusCode::OK => return Ok(response.json().await?),
                StatusCode::TOO_MANY_REQUESTS => {
                    warn!(
                        "Rate limited on {}, retrying after {:?}",
                        url, self.rate_limit_delay
                    );
                    tokio::time::sleep(self.rate_limit_delay).await;
                }
                status => {
                    return Err(HealthError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    })
                }
            }
        }
    }
}

/// Append a query parameter to `url`, keeping any it already has
pub fn with_query(url: &str, key: &str, value: &str) -> Result<String> {
    let mut url = Url::parse(url)?;
    url.query_pairs_mut().append_pair(key, value);
    Ok(url.into())
}
