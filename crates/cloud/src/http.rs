//! HTTP client wrapper with retry logic.

use crate::error::{CloudError, Result};
use reqwest::Client;
use std::time::Duration;

const BASE_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 10_000;

/// HTTP client for fetching whole files.
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    request_timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// `request_timeout: None` leaves requests unbounded.
    pub fn new(request_timeout: Option<Duration>, max_retries: u32) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            max_retries,
            request_timeout,
        })
    }

    /// GET `url` and return the body. Any non-2xx status is an error.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.execute_with_retry(self.client.get(url)).await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CloudError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        tracing::debug!(url, bytes = bytes.len(), "fetched");
        Ok(bytes.to_vec())
    }

    /// Execute a request with exponential backoff retry.
    ///
    /// Only transport failures (timeouts, refused connections) are retried;
    /// an HTTP error status is a response like any other.
    async fn execute_with_retry(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            let Some(cloned) = request.try_clone() else {
                return Ok(request.send().await?);
            };
            match cloned.send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff_ms = backoff_delay_ms(attempt);
                    tracing::warn!(attempt, backoff_ms, "request failed, retrying: {e}");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Getter for the timeout duration.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Delay before retry number `attempt` (1-based): doubles from 100 ms and
/// stays at 10 s once it gets there.
fn backoff_delay_ms(attempt: u32) -> u64 {
    2u64.checked_pow(attempt.saturating_sub(1))
        .map_or(MAX_BACKOFF_MS, |factor| BASE_BACKOFF_MS.saturating_mul(factor))
        .min(MAX_BACKOFF_MS)
}
