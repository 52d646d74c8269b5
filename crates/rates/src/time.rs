//! Country-local calendar helpers.
//!
//! Snapshots are keyed by the local date of the country they describe, not
//! by the UTC date of the run.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::models::Country;

/// Source of the current instant. Tests swap in a fixed one.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Timezone whose calendar date keys a country's snapshot.
///
/// Uzbekistan shares Tajikistan's offset and uses the same zone.
pub const fn timezone(country: Country) -> Tz {
    match country {
        Country::Tj | Country::Uz => chrono_tz::Asia::Dushanbe,
        Country::Kg => chrono_tz::Asia::Bishkek,
        Country::Kz => chrono_tz::Asia::Almaty,
    }
}

/// Converts a UTC instant to the country's local calendar date.
pub fn local_date(country: Country, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&timezone(country)).date_naive()
}

/// Date key without zero padding, e.g. `2024-3-7`.
pub fn date_key(country: Country, instant: DateTime<Utc>) -> String {
    let date = local_date(country, instant);
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Date key with zero padding, e.g. `2024-03-07`.
pub fn date_key_padded(country: Country, instant: DateTime<Utc>) -> String {
    local_date(country, instant).format("%Y-%m-%d").to_string()
}

/// Seconds since the Unix epoch.
pub fn epoch_seconds(instant: DateTime<Utc>) -> i64 {
    instant.timestamp()
}
