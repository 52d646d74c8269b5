//! Extraction for each national bank feed layout.
//!
//! Parsers return raw [`FeedRow`]s. Numbers are only read once a row has
//! been selected, so a malformed row for an unwanted currency cannot fail
//! the feed.

use scraper::Html;

use crate::errors::RatesError;
use crate::models::IndexEntry;
use crate::provider::markup::{element_text, first_text, selector};
use crate::rate::{normalize, parse_nominal};

/// One currency line of a feed, numbers still as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct FeedRow {
    pub code: String,
    nominal: Option<String>,
    value: Option<String>,
}

impl FeedRow {
    fn new(code: impl Into<String>, nominal: Option<String>, value: Option<String>) -> Self {
        Self {
            code: code.into(),
            nominal,
            value,
        }
    }

    /// Read the nominal and value of a selected row.
    pub fn into_entry(self, source_id: &str) -> Result<IndexEntry, RatesError> {
        let Self {
            code,
            nominal,
            value,
        } = self;
        let nominal = nominal
            .ok_or_else(|| RatesError::extraction(source_id, format!("{} has no nominal", code)))?;
        let value = value
            .ok_or_else(|| RatesError::extraction(source_id, format!("{} has no value", code)))?;
        Ok(IndexEntry::new(
            code,
            parse_nominal(&nominal)?,
            normalize(value.as_str())?,
        ))
    }
}

/// `<Currency ISOCode="USD"><Nominal>1</Nominal><Value>87,45</Value></Currency>`
pub(super) fn parse_nbkr(source_id: &str, body: &str) -> Result<Vec<FeedRow>, RatesError> {
    let doc = Html::parse_document(body);
    let currency = selector(source_id, "currency")?;
    let nominal = selector(source_id, "nominal")?;
    let value = selector(source_id, "value")?;

    Ok(doc
        .select(&currency)
        .filter_map(|item| {
            let code = item.value().attr("isocode").map(str::trim)?;
            (!code.is_empty()).then(|| {
                FeedRow::new(
                    code,
                    first_text(item, &nominal),
                    first_text(item, &value),
                )
            })
        })
        .collect())
}

/// `<Valute><CharCode>USD</CharCode><Nominal>1</Nominal><Value>10.9512</Value></Valute>`
pub(super) fn parse_nbt(source_id: &str, body: &str) -> Result<Vec<FeedRow>, RatesError> {
    let doc = Html::parse_document(body);
    let valute = selector(source_id, "valute")?;
    let char_code = selector(source_id, "charcode")?;
    let nominal = selector(source_id, "nominal")?;
    let value = selector(source_id, "value")?;

    Ok(doc
        .select(&valute)
        .filter_map(|item| {
            let code = first_text(item, &char_code)?;
            Some(FeedRow::new(
                code,
                first_text(item, &nominal),
                first_text(item, &value),
            ))
        })
        .collect())
}

/// RSS items: `<title>USD</title><description>448.2</description><quant>1</quant>`
pub(super) fn parse_nbk(source_id: &str, body: &str) -> Result<Vec<FeedRow>, RatesError> {
    let doc = Html::parse_document(body);
    let item_sel = selector(source_id, "item")?;
    let title = selector(source_id, "title")?;
    let description = selector(source_id, "description")?;
    let quant = selector(source_id, "quant")?;

    Ok(doc
        .select(&item_sel)
        .filter_map(|item| {
            let code = first_text(item, &title)?;
            Some(FeedRow::new(
                code,
                first_text(item, &quant),
                first_text(item, &description),
            ))
        })
        .collect())
}

/// `<div class="rates-list"><li>1 USD = 12650.00</li>...</div>`
pub(super) fn parse_cbu(source_id: &str, body: &str) -> Result<Vec<FeedRow>, RatesError> {
    let doc = Html::parse_document(body);
    let items = selector(source_id, "div.rates-list li")?;

    Ok(doc
        .select(&items)
        .filter_map(|item| {
            let text = element_text(item);
            let parts: Vec<&str> = text.split_whitespace().collect();
            let code = parts.get(1)?;
            Some(FeedRow::new(
                *code,
                parts.first().map(|s| s.to_string()),
                parts.get(3).map(|s| s.to_string()),
            ))
        })
        .collect())
}
