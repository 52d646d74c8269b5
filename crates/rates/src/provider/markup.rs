//! Small helpers over `scraper` shared by the markup-based adapters.
//!
//! XML feeds are read with the same HTML parser as bank pages: tag and
//! attribute names come out lowercased, which the selectors rely on.

use scraper::{ElementRef, Selector};

use crate::errors::RatesError;

pub(crate) fn selector(source_id: &str, css: &str) -> Result<Selector, RatesError> {
    Selector::parse(css)
        .map_err(|e| RatesError::extraction(source_id, format!("invalid selector '{}': {}", css, e)))
}

/// All descendant text of an element, trimmed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first descendant matching `selector`, if any.
pub(crate) fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(element_text)
}
