//! Built-in source wiring for the supported countries.

use std::sync::Arc;

use crate::errors::RatesError;
use crate::fetcher::Fetcher;
use crate::models::Country;
use crate::provider::{NationalBankSource, RateSource, TableLayout, TableSource};

use super::{CountryProfile, CountryRegistry};

const USD_EUR_RUB_KZT: &[&str] = &["USD", "EUR", "RUB", "KZT"];

/// Commercial banks read with a [`TableLayout`]: `(id, url, layout)`.
fn table_banks(country: Country) -> Vec<(&'static str, &'static str, TableLayout)> {
    match country {
        Country::Kg => vec![(
            "kg_bta",
            "http://www.btabank.kg/ru/",
            TableLayout::new("tbody.js-rates-cash tr", 1, 2).with_currencies(USD_EUR_RUB_KZT),
        )],
        Country::Tj => vec![
            ("tj_nbp", "http://www.nbp.tj/", TableLayout::new("#block-block-6 tr", 2, 3)),
            ("tj_tawhidbank", "http://www.tawhidbank.tj/", TableLayout::new("#nbt tr", 0, 1)),
            ("tj_ibt", "http://ibt.tj/", TableLayout::new("#ibt tr", 0, 1)),
        ],
        Country::Uz => vec![(
            "uz_nbu",
            "https://nbu.uz/en/exchange-rates/",
            TableLayout::new("div.kursdata tr", 2, 3),
        )],
        Country::Kz => vec![
            ("kz_qazaqbanki", "http://qazaqbanki.kz/rus/", TableLayout::new("#currency-41 tr", 1, 2)),
            ("kz_asiacreditbank", "http://www.asiacreditbank.kz/", TableLayout::new("#exchange-11 tr", 1, 3)),
            ("kz_bcc", "https://www.bcc.kz/about/kursy-valyut/", TableLayout::new("div.bcc_full tr", 0, 1)),
        ],
    }
}

const fn national_bank_id(country: Country) -> &'static str {
    match country {
        Country::Tj => "tj_nbt",
        Country::Uz => "uz_cbu",
        Country::Kg => "kg_nbkr",
        Country::Kz => "kz_nbk",
    }
}

/// Registry with every supported country wired to live sources.
///
/// The national bank is registered both as the first bank source and as the
/// index source; all adapters share `fetcher`.
pub fn default_registry(fetcher: Arc<dyn Fetcher>) -> Result<CountryRegistry, RatesError> {
    let mut registry = CountryRegistry::new();

    for country in Country::ALL {
        let national = Arc::new(NationalBankSource::new(
            national_bank_id(country),
            country,
            fetcher.clone(),
        ));

        let mut sources: Vec<Arc<dyn RateSource>> = Vec::new();
        sources.push(national.clone());
        for (id, url, layout) in table_banks(country) {
            sources.push(Arc::new(TableSource::new(id, url, layout, fetcher.clone())));
        }

        registry.register(country, CountryProfile::new(sources, national))?;
    }

    Ok(registry)
}
