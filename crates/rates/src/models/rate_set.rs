use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::FieldName;

/// A currency rate stored as an integer multiple of 1/10,000.
///
/// Zero doubles as the "absent or unparseable" sentinel; no real rate in this
/// domain is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaledRate(u64);

impl ScaledRate {
    /// Fixed scale factor applied to every rate.
    pub const SCALE: u64 = 10_000;

    pub const ZERO: ScaledRate = ScaledRate(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The scaled integer value.
    pub const fn value(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The rate as an exact decimal (value / 10,000).
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(Self::SCALE)
    }
}

/// Buy/sale quotes extracted from one source for one run.
///
/// Keys are field names such as `usd_buy` or `eur_sale`; a source may leave
/// out currencies it does not quote. Iteration is sorted by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateSet(BTreeMap<FieldName, ScaledRate>);

impl RateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single field, replacing any earlier value.
    pub fn insert(&mut self, field: impl Into<FieldName>, rate: ScaledRate) {
        self.0.insert(field.into(), rate);
    }

    /// Set `<code>_buy` and `<code>_sale` for a currency code.
    pub fn insert_pair(&mut self, code: &str, buy: ScaledRate, sale: ScaledRate) {
        let code = code.to_ascii_lowercase();
        self.0.insert(format!("{}_buy", code), buy);
        self.0.insert(format!("{}_sale", code), sale);
    }

    pub fn get(&self, field: &str) -> Option<ScaledRate> {
        self.0.get(field).copied()
    }

    /// Number of fields present, zero-valued ones included.
    pub fn field_count(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ScaledRate)> {
        self.0.iter().map(|(field, rate)| (field.as_str(), *rate))
    }

    pub fn values(&self) -> impl Iterator<Item = ScaledRate> + '_ {
        self.0.values().copied()
    }
}

impl<K: Into<FieldName>> FromIterator<(K, ScaledRate)> for RateSet {
    fn from_iter<I: IntoIterator<Item = (K, ScaledRate)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scaled_rate_to_decimal() {
        assert_eq!(ScaledRate::new(12005000).to_decimal(), dec!(1200.5));
        assert_eq!(ScaledRate::new(1).to_decimal(), dec!(0.0001));
        assert!(ScaledRate::ZERO.is_zero());
    }

    #[test]
    fn test_insert_pair_uses_lowercase_fields() {
        let mut rates = RateSet::new();
        rates.insert_pair("USD", ScaledRate::new(875000), ScaledRate::new(877000));

        assert_eq!(rates.get("usd_buy"), Some(ScaledRate::new(875000)));
        assert_eq!(rates.get("usd_sale"), Some(ScaledRate::new(877000)));
        assert_eq!(rates.field_count(), 2);
    }

    #[test]
    fn test_rate_set_serializes_as_flat_object() {
        let rates: RateSet = [
            ("usd_sale", ScaledRate::new(12010000)),
            ("usd_buy", ScaledRate::new(12005000)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_string(&rates).unwrap(),
            r#"{"usd_buy":12005000,"usd_sale":12010000}"#
        );
    }
}
