//! Rate source abstractions and adapters.
//!
//! This module contains:
//! - The `RateSource` and `IndexSource` traits the aggregator consumes
//! - Adapters for national bank feeds and table-shaped bank pages
//! - `source_fn` for registering a closure as a source
//!
//! # Architecture
//!
//! Adapters are opaque to the aggregator. Each one binds its url, layout and
//! `Fetcher` at construction and exposes a single zero-argument fetch.
//! Adding a bank means adding an adapter and registering it, nothing else.

mod func;
mod traits;

pub(crate) mod markup;

pub mod currency;
pub mod national_bank;
pub mod table;

// Re-exports
pub use func::{source_fn, FnSource};
pub use national_bank::{FeedFormat, NationalBankSource};
pub use table::{TableLayout, TableSource};
pub use traits::{IndexSource, RateSource};
