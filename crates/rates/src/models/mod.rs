//! Rate collection models
//!
//! This module contains the core data types for one collection run:
//! - `types` - Type aliases for identifiers (SourceId, FieldName)
//! - `country` - Supported countries (Country)
//! - `rate_set` - Scaled fixed-point rates and per-source rate sets (ScaledRate, RateSet)
//! - `index` - National bank index entries (IndexEntry, IndexRates)
//! - `snapshot` - The aggregate result document (Snapshot)

mod country;
mod index;
mod rate_set;
mod snapshot;
mod types;

pub use country::Country;
pub use index::{IndexEntry, IndexRates};
pub use rate_set::{RateSet, ScaledRate};
pub use snapshot::Snapshot;
pub use types::{FieldName, SourceId};
