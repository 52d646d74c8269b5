//! Error types and failure scoping for the rates crate.
//!
//! This module provides:
//! - [`RatesError`]: The main error enum for all collection operations
//! - [`ParseRateError`]: Numeric normalization failures
//! - [`FailureScope`]: Whether an error is contained by the aggregator or propagated

mod scope;

pub use scope::FailureScope;

use thiserror::Error;

/// Errors raised while turning raw numeric text into a scaled rate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRateError {
    /// The text is not a decimal number after separator cleanup.
    #[error("Malformed rate value: '{0}'")]
    Malformed(String),

    /// Rates are never negative in this domain.
    #[error("Negative rate value: '{0}'")]
    Negative(String),

    /// The scaled value does not fit the integer representation.
    #[error("Rate value out of range: '{0}'")]
    Overflow(String),
}

/// Errors that can occur while collecting rates.
///
/// Each variant is classified into a [`FailureScope`] via the [`scope`](Self::scope)
/// method. Source-scoped errors are logged and contained by the aggregator;
/// run-scoped errors reach the caller.
#[derive(Error, Debug)]
pub enum RatesError {
    /// Network or transport failure while reaching a source.
    #[error("Fetch failed for {url}: {message}")]
    Fetch {
        /// The url that was requested
        url: String,
        /// Transport error or unexpected status
        message: String,
    },

    /// The fetched document did not have the expected structure.
    #[error("Extraction failed for {source_id}: {message}")]
    Extraction {
        /// The source whose document could not be read
        source_id: String,
        /// What was missing or ambiguous
        message: String,
    },

    /// Text was found but is not a number.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseRateError),

    /// The source did not finish within its deadline.
    #[error("Timeout: {source_id}")]
    Timeout {
        /// The source that timed out
        source_id: String,
    },

    /// The task running the source panicked or was cancelled.
    #[error("Source task failed: {source_id} - {message}")]
    TaskFailed {
        /// The source whose task failed
        source_id: String,
        /// Join error description
        message: String,
    },

    /// No sources are registered for the requested country.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RatesError {
    /// Shorthand for an [`RatesError::Extraction`] error.
    pub fn extraction(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`RatesError::Fetch`] error.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns where this error must be handled.
    ///
    /// # Examples
    ///
    /// ```
    /// use cerp_rates::errors::{FailureScope, RatesError};
    ///
    /// let error = RatesError::Timeout { source_id: "kg_bta".to_string() };
    /// assert_eq!(error.scope(), FailureScope::Source);
    ///
    /// let error = RatesError::Configuration("unknown country 'ru'".to_string());
    /// assert_eq!(error.scope(), FailureScope::Run);
    /// ```
    pub fn scope(&self) -> FailureScope {
        match self {
            Self::Fetch { .. }
            | Self::Extraction { .. }
            | Self::Parse(_)
            | Self::Timeout { .. }
            | Self::TaskFailed { .. } => FailureScope::Source,

            Self::Configuration(_) => FailureScope::Run,
        }
    }
}
