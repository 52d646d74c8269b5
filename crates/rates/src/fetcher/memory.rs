use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FetchRequest, Fetcher};
use crate::errors::RatesError;

/// In-memory [`Fetcher`] serving canned documents by url.
///
/// Used to run adapters against saved pages without touching the network.
/// Unknown urls fail like an unreachable host.
#[derive(Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, String>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for every request to `url`, regardless of params.
    pub fn with_document(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(url.into(), body.into());
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<String, RatesError> {
        let body = self.documents.get(&request.url).cloned();
        let url = request.url.clone();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        body.ok_or_else(|| RatesError::fetch(url, "no document registered"))
    }
}
