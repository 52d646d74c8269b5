//! Source adapter trait definitions.
//!
//! This module defines the two capabilities the aggregator consumes:
//! `RateSource` for per-bank buy/sale quotes and `IndexSource` for the
//! national bank's full rate table.

use async_trait::async_trait;

use crate::errors::RatesError;
use crate::models::{IndexRates, RateSet, SourceId};

/// Trait for bank rate sources.
///
/// Implement this trait to add a new bank. The url, selectors and fetcher are
/// bound into the adapter when it is built, so fetching takes no arguments.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use cerp_rates::provider::RateSource;
///
/// struct MyBank {
///     fetcher: Arc<dyn Fetcher>,
/// }
///
/// #[async_trait]
/// impl RateSource for MyBank {
///     fn id(&self) -> SourceId {
///         SourceId::Borrowed("kg_mybank")
///     }
///
///     async fn fetch_rates(&self) -> Result<RateSet, RatesError> {
///         let body = self.fetcher.fetch(FetchRequest::get("https://mybank.kg/")).await?;
///         // ... extract fields with rate::normalize
///     }
/// }
/// ```
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Unique identifier for this source, prefixed with the country code.
    ///
    /// Used as the key in `Snapshot::bank_rates` and in log messages.
    fn id(&self) -> SourceId;

    /// Fetch and extract the current quotes.
    ///
    /// # Returns
    ///
    /// The rate set on success, or a source-scoped `RatesError` when the
    /// document cannot be fetched, is missing expected structure, or holds
    /// malformed numbers.
    async fn fetch_rates(&self) -> Result<RateSet, RatesError>;
}

/// Trait for the authoritative multi-currency index of a country.
#[async_trait]
pub trait IndexSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// Fetch the full table, keyed by currency code.
    async fn fetch_index(&self) -> Result<IndexRates, RatesError>;
}
