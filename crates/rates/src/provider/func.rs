//! Closure-backed sources.
//!
//! Lets callers register any `Fn() -> Future` as a source without writing a
//! dedicated adapter type.

use std::future::Future;

use async_trait::async_trait;

use super::{IndexSource, RateSource};
use crate::errors::RatesError;
use crate::models::{IndexRates, RateSet, SourceId};

/// A source backed by an async closure.
pub struct FnSource<F> {
    id: SourceId,
    f: F,
}

/// Wrap `f` as a source named `id`.
///
/// Implements [`RateSource`] when `f` yields a `RateSet` and [`IndexSource`]
/// when it yields `IndexRates`.
pub fn source_fn<F>(id: impl Into<SourceId>, f: F) -> FnSource<F> {
    FnSource { id: id.into(), f }
}

#[async_trait]
impl<F, Fut> RateSource for FnSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<RateSet, RatesError>> + Send,
{
    fn id(&self) -> SourceId {
        self.id.clone()
    }

    async fn fetch_rates(&self) -> Result<RateSet, RatesError> {
        (self.f)().await
    }
}

#[async_trait]
impl<F, Fut> IndexSource for FnSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<IndexRates, RatesError>> + Send,
{
    fn id(&self) -> SourceId {
        self.id.clone()
    }

    async fn fetch_index(&self) -> Result<IndexRates, RatesError> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScaledRate;

    #[tokio::test]
    async fn test_closure_rate_source() {
        let source = source_fn("kg_test", || async {
            let rates: RateSet = [("usd_buy", ScaledRate::new(875000))].into_iter().collect();
            Ok::<_, RatesError>(rates)
        });

        assert_eq!(RateSource::id(&source), "kg_test");
        let rates = source.fetch_rates().await.unwrap();
        assert_eq!(rates.get("usd_buy"), Some(ScaledRate::new(875000)));
    }

    #[tokio::test]
    async fn test_closure_index_source_propagates_errors() {
        let source = source_fn("kg_index", || async {
            Err::<IndexRates, _>(RatesError::extraction("kg_index", "rates not found"))
        });

        assert!(source.fetch_index().await.is_err());
    }
}
