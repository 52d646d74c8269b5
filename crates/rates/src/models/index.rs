use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rate_set::ScaledRate;

/// One currency from the national bank's full rate table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// ISO 4217 code, e.g. "USD"
    pub code: String,

    /// Unit denomination the value applies to (e.g. 100 for per-100-units quotes)
    pub nominal: u32,

    pub value: ScaledRate,
}

impl IndexEntry {
    pub fn new(code: impl Into<String>, nominal: u32, value: ScaledRate) -> Self {
        Self {
            code: code.into(),
            nominal,
            value,
        }
    }
}

/// Full index keyed by currency code. Replaced wholesale every run.
pub type IndexRates = BTreeMap<String, IndexEntry>;
