//! Fetch capability consumed by source adapters.
//!
//! The aggregator never fetches anything itself; adapters receive an
//! `Arc<dyn Fetcher>` when they are built and bind their urls to it.

mod http;
mod memory;

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::RatesError;

pub use http::HttpFetcher;
pub use memory::MemoryFetcher;

/// Per-fetch timeout applied when neither the request nor the fetcher sets one.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single request to a source.
///
/// GET sends `params` as the query string, POST as a form body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub method: HttpMethod,
    pub params: Vec<(String, String)>,
    /// Overrides the fetcher's own timeout
    pub timeout: Option<Duration>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            params: Vec::new(),
            timeout: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Retrieves raw documents from the network.
///
/// Failures are reported as [`RatesError::Fetch`] carrying the url.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<String, RatesError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = FetchRequest::get("http://nbt.tj/ru/kurs/export_xml.php")
            .with_param("date", "2024-03-07")
            .with_param("export", "xmlout");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.params.len(), 2);
        assert_eq!(request.timeout, None);

        let request = FetchRequest::post("http://example.kg/rates").with_timeout(Duration::from_secs(3));
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.timeout, Some(Duration::from_secs(3)));
    }
}
