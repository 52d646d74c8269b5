//! Currency allow-list for national bank indexes.

/// Codes kept in `Snapshot::all_rates`. Feeds publish many more, most of
/// them irrelevant to the region.
pub const ALLOWED: &[&str] = &[
    "AED", "AFN", "AMD", "AUD", "AZN", "BYN", "CAD", "CHF", "CNY", "CZK", "DKK", "EUR", "GBP",
    "GEL", "HKD", "INR", "IRR", "JPY", "KGS", "KRW", "KZT", "MDL", "NOK", "PKR", "PLN", "RUB",
    "SAR", "SEK", "SGD", "TJS", "TMT", "TRY", "UAH", "USD", "UZS", "XDR",
];

pub fn is_allowed(code: &str) -> bool {
    ALLOWED.contains(&code)
}
