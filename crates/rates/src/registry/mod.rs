//! Country registry module.
//!
//! This module maps each country to its configured sources:
//! - The bank rate sources whose quotes fill `Snapshot::bank_rates`
//! - The index source whose table becomes `Snapshot::all_rates`
//! - The default wiring for the supported countries

mod country_registry;
mod defaults;

pub use country_registry::{CountryProfile, CountryRegistry};
pub use defaults::default_registry;
