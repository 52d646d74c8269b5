use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::country::Country;
use super::index::IndexRates;
use super::rate_set::RateSet;
use super::types::SourceId;

/// The aggregate result of one collection run.
///
/// `bank_rates` only ever holds sources that produced at least one non-zero
/// rate. `all_rates` is always present and may be empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub country: Country,

    /// Local calendar date of the country, `YYYY-M-D`
    pub date_key: String,

    /// UTC epoch seconds at the start of the run
    pub timestamp: i64,

    pub bank_rates: BTreeMap<SourceId, RateSet>,

    pub all_rates: IndexRates,
}

impl Snapshot {
    /// Number of sources represented in `bank_rates`.
    pub fn source_count(&self) -> usize {
        self.bank_rates.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
