//! Registry of sources per country.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use crate::errors::RatesError;
use crate::models::Country;
use crate::provider::{IndexSource, RateSource};

/// The sources configured for one country.
#[derive(Clone)]
pub struct CountryProfile {
    pub sources: Vec<Arc<dyn RateSource>>,
    pub index: Arc<dyn IndexSource>,
}

impl CountryProfile {
    pub fn new(sources: Vec<Arc<dyn RateSource>>, index: Arc<dyn IndexSource>) -> Self {
        Self { sources, index }
    }

    /// Ids of the bank sources, in registration order.
    pub fn source_ids(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.id().into_owned()).collect()
    }
}

/// Registry mapping each country to its [`CountryProfile`].
#[derive(Clone, Default)]
pub struct CountryRegistry {
    profiles: HashMap<Country, CountryProfile>,
}

impl CountryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the profile for a country, replacing any earlier one.
    ///
    /// Source ids key the snapshot, so a profile with two sources sharing an
    /// id is rejected.
    pub fn register(&mut self, country: Country, profile: CountryProfile) -> Result<(), RatesError> {
        let mut seen = HashSet::new();
        for source in &profile.sources {
            let id = source.id();
            if !seen.insert(id.clone()) {
                return Err(RatesError::Configuration(format!(
                    "duplicate source id '{}' for country '{}'",
                    id, country
                )));
            }
        }

        debug!(
            "Registered {} sources and index '{}' for '{}'",
            profile.sources.len(),
            profile.index.id(),
            country
        );
        self.profiles.insert(country, profile);
        Ok(())
    }

    /// Profile of a country, or a configuration error if none is registered.
    pub fn profile(&self, country: Country) -> Result<&CountryProfile, RatesError> {
        self.profiles.get(&country).ok_or_else(|| {
            RatesError::Configuration(format!("no sources registered for country '{}'", country))
        })
    }

    /// Registered countries, sorted.
    pub fn countries(&self) -> Vec<Country> {
        let mut countries: Vec<Country> = self.profiles.keys().copied().collect();
        countries.sort();
        countries
    }
}
