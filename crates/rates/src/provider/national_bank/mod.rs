//! National bank feeds.
//!
//! Each country's central bank publishes an official rate table. One adapter
//! serves two roles:
//! - as a [`RateSource`], the official USD/EUR/RUB(/KZT) rates become a bank
//!   entry whose buy and sale are equal;
//! - as an [`IndexSource`], the whole table (restricted to the currency
//!   allow-list) becomes `Snapshot::all_rates`.

mod feeds;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use super::currency;
use super::{IndexSource, RateSource};
use crate::errors::RatesError;
use crate::fetcher::{FetchRequest, Fetcher};
use crate::models::{Country, IndexRates, RateSet, SourceId};
use crate::time::{date_key_padded, system_clock, Clock};

use feeds::FeedRow;

const NBKR_DAILY_URL: &str = "http://www.nbkr.kg/XML/daily.xml";
const NBKR_WEEKLY_URL: &str = "http://www.nbkr.kg/XML/weekly.xml";
const NBT_URL: &str = "http://nbt.tj/ru/kurs/export_xml.php";
const NBK_URL: &str = "http://www.nationalbank.kz/rss/rates_all.xml";
const CBU_URL: &str = "http://www.cbu.uz/ru/";

/// Layout of a national bank feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedFormat {
    /// National Bank of the Kyrgyz Republic: daily and weekly XML
    Nbkr,
    /// National Bank of Tajikistan: XML export, dated by local day
    Nbt,
    /// National Bank of Kazakhstan: RSS
    Nbk,
    /// Central Bank of Uzbekistan: HTML rate list
    Cbu,
}

impl FeedFormat {
    /// Feed used for the given country.
    pub const fn for_country(country: Country) -> Self {
        match country {
            Country::Tj => Self::Nbt,
            Country::Uz => Self::Cbu,
            Country::Kg => Self::Nbkr,
            Country::Kz => Self::Nbk,
        }
    }

    /// Currencies copied into the bank entry.
    const fn bank_currencies(self) -> &'static [&'static str] {
        match self {
            Self::Nbkr => &["USD", "EUR", "RUB", "KZT"],
            Self::Nbt | Self::Nbk | Self::Cbu => &["USD", "EUR", "RUB"],
        }
    }
}

/// Adapter for a country's national bank.
pub struct NationalBankSource {
    id: SourceId,
    country: Country,
    format: FeedFormat,
    fetcher: Arc<dyn Fetcher>,
    clock: Clock,
}

impl NationalBankSource {
    pub fn new(id: impl Into<SourceId>, country: Country, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            id: id.into(),
            country,
            format: FeedFormat::for_country(country),
            fetcher,
            clock: system_clock(),
        }
    }

    /// Replace the wall clock used to date feed requests.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn format(&self) -> FeedFormat {
        self.format
    }

    /// Fetch and split the primary table of the feed into rows.
    async fn primary_table(&self) -> Result<Vec<FeedRow>, RatesError> {
        let rows = match self.format {
            FeedFormat::Nbkr => {
                let body = self.fetcher.fetch(FetchRequest::get(NBKR_DAILY_URL)).await?;
                feeds::parse_nbkr(&self.id, &body)?
            }
            FeedFormat::Nbt => {
                let request = FetchRequest::get(NBT_URL)
                    .with_param("date", date_key_padded(self.country, (self.clock)()))
                    .with_param("export", "xmlout");
                let body = self.fetcher.fetch(request).await?;
                feeds::parse_nbt(&self.id, &body)?
            }
            FeedFormat::Nbk => {
                let body = self.fetcher.fetch(FetchRequest::get(NBK_URL)).await?;
                feeds::parse_nbk(&self.id, &body)?
            }
            FeedFormat::Cbu => {
                let body = self.fetcher.fetch(FetchRequest::get(CBU_URL)).await?;
                feeds::parse_cbu(&self.id, &body)?
            }
        };

        if rows.is_empty() {
            return Err(RatesError::extraction(&*self.id, "rates not found"));
        }
        Ok(rows)
    }

    /// Additional, less frequently updated table. Only the NBKR has one.
    async fn secondary_table(&self) -> Result<Vec<FeedRow>, RatesError> {
        match self.format {
            FeedFormat::Nbkr => {
                let body = self.fetcher.fetch(FetchRequest::get(NBKR_WEEKLY_URL)).await?;
                let rows = feeds::parse_nbkr(&self.id, &body)?;
                if rows.is_empty() {
                    return Err(RatesError::extraction(&*self.id, "rates not found"));
                }
                Ok(rows)
            }
            FeedFormat::Nbt | FeedFormat::Nbk | FeedFormat::Cbu => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl RateSource for NationalBankSource {
    fn id(&self) -> SourceId {
        self.id.clone()
    }

    async fn fetch_rates(&self) -> Result<RateSet, RatesError> {
        let wanted = self.format.bank_currencies();

        let mut rates = RateSet::new();
        for row in self.primary_table().await? {
            if !wanted.contains(&row.code.as_str()) {
                continue;
            }
            let entry = row.into_entry(&self.id)?;
            rates.insert_pair(&entry.code, entry.value, entry.value);
        }
        Ok(rates)
    }
}

#[async_trait]
impl IndexSource for NationalBankSource {
    fn id(&self) -> SourceId {
        self.id.clone()
    }

    async fn fetch_index(&self) -> Result<IndexRates, RatesError> {
        let mut index = IndexRates::new();

        // The NBKR daily table is the official one and is kept whole.
        let keep_all = self.format == FeedFormat::Nbkr;
        for row in self.primary_table().await? {
            if keep_all || currency::is_allowed(&row.code) {
                let entry = row.into_entry(&self.id)?;
                index.insert(entry.code.clone(), entry);
            }
        }

        for row in self.secondary_table().await? {
            if currency::is_allowed(&row.code) {
                let entry = row.into_entry(&self.id)?;
                index.insert(entry.code.clone(), entry);
            }
        }

        debug!("[{}] index '{}' has {} currencies", self.country, self.id, index.len());
        Ok(index)
    }
}
