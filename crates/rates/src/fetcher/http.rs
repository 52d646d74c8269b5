use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{FetchRequest, Fetcher, HttpMethod, DEFAULT_FETCH_TIMEOUT};
use crate::errors::RatesError;

const USER_AGENT: &str = concat!("cerp/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`Fetcher`].
///
/// Many bank sites serve broken or self-signed certificates, so GET requests
/// skip certificate validation. POST requests keep it.
pub struct HttpFetcher {
    client: Client,
    lenient_client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Fetcher whose requests give up after `timeout` unless they set their own.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        let lenient_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()
            .unwrap_or_else(|_| client.clone());

        Self {
            client,
            lenient_client,
            timeout,
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<String, RatesError> {
        debug!("{:?} {}", request.method, request.url);

        let builder = match request.method {
            HttpMethod::Get => self.lenient_client.get(&request.url).query(&request.params),
            HttpMethod::Post => self.client.post(&request.url).form(&request.params),
        };

        let response = builder
            .timeout(request.timeout.unwrap_or(self.timeout))
            .send()
            .await
            .map_err(|e| RatesError::fetch(&request.url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::fetch(
                &request.url,
                format!("unexpected status {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| RatesError::fetch(&request.url, e.to_string()))
    }
}
