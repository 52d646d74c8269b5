//! Numeric normalization for rate text scraped from bank pages.
//!
//! Sources format numbers with inconsistent regional conventions
//! (`"12 650,00"`, `"1,234.56"`, `"87.45"`). Everything is reduced to a
//! [`ScaledRate`]: the exact decimal value times 10,000, rounded to an integer.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::ParseRateError;
use crate::models::{RateSet, ScaledRate};

/// Convert raw numeric text into a [`ScaledRate`].
///
/// Absent, empty or whitespace-only input yields the zero sentinel. When the
/// text has both a comma and a period, commas are thousands separators and
/// are dropped; a lone comma is the decimal separator. This heuristic reads
/// `"1,234"` as `1.234`.
///
/// Malformed text is an error, never a silent zero.
///
/// # Examples
///
/// ```
/// use cerp_rates::rate::normalize;
///
/// assert_eq!(normalize("1,234.56").unwrap().value(), 12345600);
/// assert_eq!(normalize("12,5").unwrap().value(), 125000);
/// assert_eq!(normalize(None).unwrap().value(), 0);
/// assert!(normalize("n/a").is_err());
/// ```
pub fn normalize<'a>(raw: impl Into<Option<&'a str>>) -> Result<ScaledRate, ParseRateError> {
    let Some(raw) = raw.into() else {
        return Ok(ScaledRate::ZERO);
    };

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(ScaledRate::ZERO);
    }

    let text = if compact.contains(',') && compact.contains('.') {
        compact.replace(',', "")
    } else {
        compact.replace(',', ".")
    };

    let value =
        Decimal::from_str(&text).map_err(|_| ParseRateError::Malformed(raw.trim().to_string()))?;

    if value.is_zero() {
        return Ok(ScaledRate::ZERO);
    }
    if value.is_sign_negative() {
        return Err(ParseRateError::Negative(raw.trim().to_string()));
    }

    value
        .checked_mul(Decimal::from(ScaledRate::SCALE))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|scaled| scaled.to_u64())
        .map(ScaledRate::new)
        .ok_or_else(|| ParseRateError::Overflow(raw.trim().to_string()))
}

/// Returns true when every rate in the set is the zero sentinel.
///
/// A set with no fields at all is empty too: it carries nothing usable.
pub fn is_empty(rates: &RateSet) -> bool {
    rates.values().all(ScaledRate::is_zero)
}

/// Parse a unit denomination such as `"1"` or `" 100 "`.
pub fn parse_nominal(raw: &str) -> Result<u32, ParseRateError> {
    let text = raw.trim();
    match text.parse::<u32>() {
        Ok(nominal) if nominal > 0 => Ok(nominal),
        _ => Err(ParseRateError::Malformed(text.to_string())),
    }
}
