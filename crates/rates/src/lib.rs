//! CERP Rates Crate
//!
//! This crate collects exchange rates published by banks in Central Asia and
//! assembles them into one snapshot per country.
//!
//! # Overview
//!
//! The rates crate supports:
//! - Numeric normalization of regionally formatted rate text into fixed-point integers
//! - Pluggable bank sources (national bank feeds, table-shaped bank pages, closures)
//! - Fault-isolated, concurrent collection: one broken source never breaks a run
//! - Country-local date keys for snapshots
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! | CountryRegistry  |  (country -> sources + index)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |   Aggregator     | --> |   RateSource     |  (one isolated task per bank)
//! +------------------+     +------------------+
//!          |                        |
//!          |                        v
//!          |               +------------------+
//!          |               |  Fetcher + rate  |  (HTTP, normalization)
//!          |               +------------------+
//!          v
//! +------------------+
//! |    Snapshot      |  (bank_rates + all_rates)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Country`] - Supported countries
//! - [`ScaledRate`] - A rate times 10,000, as an integer
//! - [`RateSet`] - Buy/sale fields from one source
//! - [`IndexEntry`] - One row of a national bank table
//! - [`Snapshot`] - The result of a collection run
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cerp_rates::{default_registry, Aggregator, Country, HttpFetcher};
//!
//! # async fn example() -> Result<(), cerp_rates::RatesError> {
//! let registry = default_registry(Arc::new(HttpFetcher::new()))?;
//! let snapshot = Aggregator::default().collect(&registry, Country::Kg).await?;
//! println!("{} banks", snapshot.source_count());
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod provider;
pub mod rate;
pub mod registry;
pub mod time;

// Re-export all public types from models
pub use models::{
    Country, FieldName, IndexEntry, IndexRates, RateSet, ScaledRate, Snapshot, SourceId,
};

pub use aggregator::{Aggregator, AggregatorConfig};
pub use errors::{FailureScope, ParseRateError, RatesError};
pub use fetcher::{FetchRequest, Fetcher, HttpFetcher, MemoryFetcher};

// Re-export provider types
pub use provider::{
    source_fn, FeedFormat, IndexSource, NationalBankSource, RateSource, TableLayout, TableSource,
};

// Re-export registry types
pub use registry::{default_registry, CountryProfile, CountryRegistry};
