//! Generic adapter for banks that publish rates as an HTML table.
//!
//! Most commercial banks in the region render one row per currency with the
//! buy and sale quotes in fixed columns. A [`TableLayout`] describes where to
//! look; [`TableSource`] does the fetching and extraction.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use scraper::Html;

use super::markup::{element_text, selector};
use super::RateSource;
use crate::errors::RatesError;
use crate::fetcher::{FetchRequest, Fetcher};
use crate::models::{RateSet, SourceId};
use crate::rate::normalize;

/// Where the quotes sit in a bank's page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableLayout {
    /// Selector for the rows, e.g. `#rates tr`
    pub rows: &'static str,
    /// Selector for cells within a row
    pub cells: &'static str,
    /// Column index of the buy quote
    pub buy: usize,
    /// Column index of the sale quote
    pub sale: usize,
    /// Currency codes to look for, in order of preference. When several rows
    /// name the same currency, the last one wins.
    pub currencies: &'static [&'static str],
}

impl TableLayout {
    pub const fn new(rows: &'static str, buy: usize, sale: usize) -> Self {
        Self {
            rows,
            cells: "td",
            buy,
            sale,
            currencies: &["USD", "EUR", "RUB"],
        }
    }

    pub const fn with_currencies(mut self, currencies: &'static [&'static str]) -> Self {
        self.currencies = currencies;
        self
    }

    /// First listed currency whose code appears in `text`. Matching is case-sensitive.
    fn currency_in(&self, text: &str) -> Option<&'static str> {
        self.currencies.iter().copied().find(|code| text.contains(code))
    }
}

/// A bank whose page is read with a [`TableLayout`].
pub struct TableSource {
    id: SourceId,
    request: FetchRequest,
    layout: TableLayout,
    fetcher: Arc<dyn Fetcher>,
}

impl TableSource {
    pub fn new(
        id: impl Into<SourceId>,
        url: impl Into<String>,
        layout: TableLayout,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            id: id.into(),
            request: FetchRequest::get(url),
            layout,
            fetcher,
        }
    }

    /// Replace the plain GET with a custom request, e.g. a form POST.
    pub fn with_request(mut self, request: FetchRequest) -> Self {
        self.request = request;
        self
    }

    pub fn url(&self) -> &str {
        &self.request.url
    }

    fn extract(&self, body: &str) -> Result<RateSet, RatesError> {
        let doc = Html::parse_document(body);
        let rows = selector(&self.id, self.layout.rows)?;
        let cells = selector(&self.id, self.layout.cells)?;

        let mut rates = RateSet::new();
        let mut row_count = 0;
        for row in doc.select(&rows) {
            row_count += 1;
            let Some(code) = self.layout.currency_in(&element_text(row)) else {
                continue;
            };

            let columns: Vec<String> = row.select(&cells).map(element_text).collect();
            let cell = |index: usize| {
                columns.get(index).map(String::as_str).ok_or_else(|| {
                    RatesError::extraction(
                        &*self.id,
                        format!("{} row has no column {}", code, index),
                    )
                })
            };

            rates.insert_pair(
                code,
                normalize(cell(self.layout.buy)?)?,
                normalize(cell(self.layout.sale)?)?,
            );
        }

        if row_count == 0 {
            return Err(RatesError::extraction(&*self.id, "rates not found"));
        }
        Ok(rates)
    }
}

#[async_trait]
impl RateSource for TableSource {
    fn id(&self) -> SourceId {
        self.id.clone()
    }

    async fn fetch_rates(&self) -> Result<RateSet, RatesError> {
        let body = self.fetcher.fetch(self.request.clone()).await?;
        let rates = self.extract(&body)?;
        debug!("'{}' extracted {} fields", self.id, rates.field_count());
        Ok(rates)
    }
}
