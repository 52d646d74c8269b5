//! Aggregation orchestrator.
//!
//! Runs every bank source and the index source of a country, each behind its
//! own isolation boundary, and assembles the results into a [`Snapshot`].
//!
//! # Isolation
//!
//! Every adapter call is spawned as a separate task and bounded by a
//! per-source deadline:
//! - an error, a timeout or a panic is logged and the source is dropped;
//! - a source returning only zero-valued rates is dropped with a warning;
//! - nothing a single source does can abort the run or block the others.
//!
//! The index source runs alongside the bank sources. Its failure leaves
//! `all_rates` empty without affecting `bank_rates`.

mod isolation;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::{debug, error, info, warn};
use tokio::sync::Semaphore;
use tokio::time::Instant;

use crate::errors::RatesError;
use crate::models::{Country, IndexRates, RateSet, Snapshot, SourceId};
use crate::provider::{IndexSource, RateSource};
use crate::rate;
use crate::registry::CountryRegistry;
use crate::time::{date_key, epoch_seconds, system_clock, Clock};

use isolation::isolate;

/// Deadline for a single adapter call, fetches and extraction included.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs longer than this are reported with a warning.
pub const DEFAULT_SLOW_RUN_THRESHOLD: Duration = Duration::from_secs(60);

/// Upper bound on adapters running at the same time.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Tuning knobs for [`Aggregator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub source_timeout: Duration,
    pub slow_run_threshold: Duration,
    pub max_concurrency: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            slow_run_threshold: DEFAULT_SLOW_RUN_THRESHOLD,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Collects one snapshot per call. Holds no state between runs.
#[derive(Clone)]
pub struct Aggregator {
    config: AggregatorConfig,
    clock: Clock,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::default())
    }
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            clock: system_clock(),
        }
    }

    /// Replace the wall clock used for `date_key` and `timestamp`.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Collect a snapshot for a registered country.
    ///
    /// Fails only when the country has no profile in `registry`. Source
    /// failures never surface here.
    pub async fn collect(
        &self,
        registry: &CountryRegistry,
        country: Country,
    ) -> Result<Snapshot, RatesError> {
        let profile = registry.profile(country)?;
        Ok(self
            .run(country, &profile.sources, Arc::clone(&profile.index))
            .await)
    }

    /// Run `sources` and `index` for `country` and assemble the snapshot.
    ///
    /// Sources are independent of each other; the order they finish in does
    /// not affect the result.
    pub async fn run(
        &self,
        country: Country,
        sources: &[Arc<dyn RateSource>],
        index: Arc<dyn IndexSource>,
    ) -> Snapshot {
        let started = Instant::now();
        // The snapshot is stamped with the start of the run.
        let now = (self.clock)();
        let permits = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let deadline = self.config.source_timeout;

        info!(
            "[{}] Collecting rates from {} sources",
            country,
            sources.len()
        );

        let bank_tasks = sources.iter().map(|source| {
            let source = Arc::clone(source);
            let id = source.id();
            let task = isolate(id.clone(), Some(Arc::clone(&permits)), deadline, async move {
                source.fetch_rates().await
            });
            async move { (id, task.await) }
        });

        let index_id = index.id();
        let index_task = isolate(index_id.clone(), None, deadline, async move {
            index.fetch_index().await
        });

        let (bank_results, index_result) = tokio::join!(join_all(bank_tasks), index_task);

        let (bank_rates, tally) = keep_usable(country, bank_results);
        let all_rates = match index_result {
            Ok(all_rates) => {
                if all_rates.is_empty() {
                    warn!("[{}] Index '{}' returned no currencies", country, index_id);
                }
                all_rates
            }
            Err(e) => {
                error!("[{}] Index '{}' failed: {}", country, index_id, e);
                IndexRates::new()
            }
        };

        let elapsed = started.elapsed();
        if elapsed > self.config.slow_run_threshold {
            warn!(
                "[{}] Collection took {:.1}s, longer than {}s",
                country,
                elapsed.as_secs_f64(),
                self.config.slow_run_threshold.as_secs()
            );
        }

        info!(
            "[{}] Collected {} of {} sources ({} failed, {} empty) and {} index currencies in {:.1}s",
            country,
            bank_rates.len(),
            sources.len(),
            tally.failed,
            tally.empty,
            all_rates.len(),
            elapsed.as_secs_f64()
        );

        Snapshot {
            country,
            date_key: date_key(country, now),
            timestamp: epoch_seconds(now),
            bank_rates,
            all_rates,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    failed: usize,
    empty: usize,
}

/// Drop failed and empty results, logging each one.
fn keep_usable(
    country: Country,
    results: Vec<(SourceId, Result<RateSet, RatesError>)>,
) -> (BTreeMap<SourceId, RateSet>, Tally) {
    let mut kept = BTreeMap::new();
    let mut tally = Tally::default();
    for (id, result) in results {
        match result {
            Ok(rates) if rate::is_empty(&rates) => {
                warn!("[{}] Source '{}' returned no rates", country, id);
                tally.empty += 1;
            }
            Ok(rates) => {
                debug!(
                    "[{}] Source '{}' returned {} fields",
                    country,
                    id,
                    rates.field_count()
                );
                kept.insert(id, rates);
            }
            Err(e) => {
                error!("[{}] Source '{}' failed: {}", country, id, e);
                tally.failed += 1;
            }
        }
    }
    (kept, tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndexEntry, ScaledRate};
    use crate::provider::source_fn;
    use crate::rate::normalize;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    enum Behavior {
        Rates(RateSet),
        Fail,
        Panic,
        Hang,
    }

    struct MockSource {
        id: &'static str,
        behavior: Behavior,
        call_count: AtomicUsize,
    }

    impl MockSource {
        fn new(id: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                id,
                behavior,
                call_count: AtomicUsize::new(0),
            })
        }

        fn quoting(id: &'static str, usd_buy: u64) -> Arc<Self> {
            let rates = [("usd_buy", ScaledRate::new(usd_buy))].into_iter().collect();
            Self::new(id, Behavior::Rates(rates))
        }
    }

    #[async_trait]
    impl RateSource for MockSource {
        fn id(&self) -> SourceId {
            SourceId::Borrowed(self.id)
        }

        async fn fetch_rates(&self) -> Result<RateSet, RatesError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Rates(rates) => Ok(rates.clone()),
                Behavior::Fail => Err(RatesError::extraction(self.id, "rates not found")),
                Behavior::Panic => panic!("adapter bug in {}", self.id),
                Behavior::Hang => {
                    std::future::pending::<()>().await;
                    Ok(RateSet::new())
                }
            }
        }
    }

    fn usd_index() -> Arc<dyn IndexSource> {
        Arc::new(source_fn("test_index", || async {
            let mut index = IndexRates::new();
            index.insert("USD".to_string(), IndexEntry::new("USD", 1, normalize("12.34")?));
            Ok::<_, RatesError>(index)
        }))
    }

    fn failing_index() -> Arc<dyn IndexSource> {
        Arc::new(source_fn("test_index", || async {
            Err::<IndexRates, _>(RatesError::fetch("http://index.example/", "connection refused"))
        }))
    }

    fn sources(list: Vec<Arc<MockSource>>) -> Vec<Arc<dyn RateSource>> {
        list.into_iter()
            .map(|s| s as Arc<dyn RateSource>)
            .collect()
    }

    #[tokio::test]
    async fn test_failed_and_empty_sources_are_excluded() {
        let ok_a = MockSource::quoting("kg_a", 874500);
        let ok_b = MockSource::quoting("kg_b", 875000);
        let failing = MockSource::new("kg_failing", Behavior::Fail);
        let empty = MockSource::new("kg_empty", Behavior::Rates(RateSet::new()));
        let zeros = MockSource::new(
            "kg_zeros",
            Behavior::Rates([("usd_buy", ScaledRate::ZERO)].into_iter().collect()),
        );

        let snapshot = Aggregator::default()
            .run(
                Country::Kg,
                &sources(vec![ok_a.clone(), failing.clone(), ok_b, empty, zeros]),
                usd_index(),
            )
            .await;

        assert_eq!(snapshot.source_count(), 2);
        assert!(snapshot.bank_rates.contains_key("kg_a"));
        assert!(snapshot.bank_rates.contains_key("kg_b"));
        assert!(!snapshot.bank_rates.contains_key("kg_failing"));
        assert!(!snapshot.bank_rates.contains_key("kg_empty"));
        assert!(!snapshot.bank_rates.contains_key("kg_zeros"));

        // One attempt per source, no retries
        assert_eq!(ok_a.call_count.load(Ordering::SeqCst), 1);
        assert_eq!(failing.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_sources_failing_still_yields_snapshot() {
        let snapshot = Aggregator::default()
            .run(
                Country::Tj,
                &sources(vec![
                    MockSource::new("tj_a", Behavior::Fail),
                    MockSource::new("tj_b", Behavior::Fail),
                ]),
                usd_index(),
            )
            .await;

        assert!(snapshot.bank_rates.is_empty());
        assert_eq!(snapshot.all_rates.len(), 1);
    }

    #[tokio::test]
    async fn test_index_failure_leaves_bank_rates_intact() {
        let snapshot = Aggregator::default()
            .run(
                Country::Kz,
                &sources(vec![MockSource::quoting("kz_a", 4480000)]),
                failing_index(),
            )
            .await;

        assert!(snapshot.all_rates.is_empty());
        assert_eq!(
            snapshot.bank_rates["kz_a"].get("usd_buy"),
            Some(ScaledRate::new(4480000))
        );
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let a: Arc<dyn RateSource> = Arc::new(source_fn("a", || async {
            let mut rates = RateSet::new();
            rates.insert("usd_buy", normalize("1,200.50")?);
            Ok::<_, RatesError>(rates)
        }));
        let b: Arc<dyn RateSource> = Arc::new(source_fn("b", || async {
            Err::<RateSet, _>(RatesError::extraction("b", "rates not found"))
        }));

        let snapshot = Aggregator::default()
            .run(Country::Kg, &[a, b], usd_index())
            .await;

        let expected_bank: RateSet = [("usd_buy", ScaledRate::new(12005000))].into_iter().collect();
        assert_eq!(snapshot.bank_rates.len(), 1);
        assert_eq!(snapshot.bank_rates["a"], expected_bank);
        assert_eq!(
            snapshot.all_rates["USD"],
            IndexEntry::new("USD", 1, ScaledRate::new(123400))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_source_times_out_without_blocking_others() {
        let aggregator = Aggregator::new(AggregatorConfig {
            source_timeout: Duration::from_secs(5),
            ..AggregatorConfig::default()
        });

        let snapshot = aggregator
            .run(
                Country::Uz,
                &sources(vec![
                    MockSource::new("uz_hung", Behavior::Hang),
                    MockSource::quoting("uz_ok", 126500000),
                ]),
                usd_index(),
            )
            .await;

        assert_eq!(snapshot.source_count(), 1);
        assert!(snapshot.bank_rates.contains_key("uz_ok"));
    }

    #[tokio::test]
    async fn test_panicking_source_is_isolated() {
        let snapshot = Aggregator::default()
            .run(
                Country::Tj,
                &sources(vec![
                    MockSource::new("tj_panics", Behavior::Panic),
                    MockSource::quoting("tj_ok", 109500),
                ]),
                usd_index(),
            )
            .await;

        assert_eq!(snapshot.source_count(), 1);
        assert!(snapshot.bank_rates.contains_key("tj_ok"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let list: Vec<Arc<dyn RateSource>> = ["kz_1", "kz_2", "kz_3", "kz_4", "kz_5", "kz_6"]
            .into_iter()
            .map(|id| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                Arc::new(source_fn(id, move || {
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        let rates: RateSet = [("usd_buy", ScaledRate::new(1))].into_iter().collect();
                        Ok::<_, RatesError>(rates)
                    }
                })) as Arc<dyn RateSource>
            })
            .collect();

        let aggregator = Aggregator::new(AggregatorConfig {
            max_concurrency: 2,
            ..AggregatorConfig::default()
        });
        let snapshot = aggregator.run(Country::Kz, &list, usd_index()).await;

        assert_eq!(snapshot.source_count(), 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_date_key_and_timestamp_from_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 12, 31, 20, 30, 0).unwrap();
        let aggregator = Aggregator::default().with_clock(move || instant);

        let snapshot = aggregator.run(Country::Kg, &[], usd_index()).await;

        assert_eq!(snapshot.date_key, "2025-1-1");
        assert_eq!(snapshot.timestamp, instant.timestamp());
        assert_eq!(snapshot.country, Country::Kg);
    }

    #[tokio::test]
    async fn test_snapshot_is_stamped_before_sources_run() {
        let clock_read = Arc::new(AtomicBool::new(false));
        let observed = Arc::clone(&clock_read);

        let source: Arc<dyn RateSource> = Arc::new(source_fn("kg_a", move || {
            let stamped = observed.load(Ordering::SeqCst);
            async move {
                if !stamped {
                    return Err(RatesError::extraction("kg_a", "clock not read yet"));
                }
                Ok([("usd_buy", ScaledRate::new(1))].into_iter().collect::<RateSet>())
            }
        }));

        let flag = Arc::clone(&clock_read);
        let instant = Utc.with_ymd_and_hms(2024, 3, 6, 17, 59, 0).unwrap();
        let aggregator = Aggregator::default().with_clock(move || {
            flag.store(true, Ordering::SeqCst);
            instant
        });

        let snapshot = aggregator.run(Country::Kg, &[source], usd_index()).await;

        assert_eq!(snapshot.source_count(), 1);
        assert_eq!(snapshot.date_key, "2024-3-6");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_run_still_yields_snapshot() {
        let slow: Arc<dyn RateSource> = Arc::new(source_fn("uz_slow", || async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Ok::<_, RatesError>([("usd_buy", ScaledRate::new(1))].into_iter().collect::<RateSet>())
        }));
        let aggregator = Aggregator::new(AggregatorConfig {
            slow_run_threshold: Duration::from_secs(1),
            ..AggregatorConfig::default()
        });

        let started = Instant::now();
        let snapshot = aggregator.run(Country::Uz, &[slow], usd_index()).await;

        assert!(started.elapsed() > aggregator.config().slow_run_threshold);
        assert_eq!(snapshot.source_count(), 1);
        assert!(snapshot.bank_rates.contains_key("uz_slow"));
    }

    #[tokio::test]
    async fn test_collect_unknown_country_is_configuration_error() {
        let registry = CountryRegistry::new();
        let result = Aggregator::default().collect(&registry, Country::Kg).await;
        assert!(matches!(result, Err(RatesError::Configuration(_))));
    }
}
