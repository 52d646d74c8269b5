use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use cerp_rates::{AggregatorConfig, Country};

/// How the snapshot is written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Pretty,
    /// zlib-compressed, base64-encoded JSON
    Compressed,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compressed" => Ok(Self::Compressed),
            other => Err(anyhow!(
                "Invalid CERP_OUTPUT '{}', expected json, pretty or compressed",
                other
            )),
        }
    }
}

pub struct Config {
    pub country: Country,
    pub fetch_timeout: Duration,
    pub aggregator: AggregatorConfig,
    pub output: OutputFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let country: Country = lookup("CERP_COUNTRY")
            .context("CERP_COUNTRY is not set")?
            .parse()
            .context("Invalid CERP_COUNTRY")?;

        let secs = |key: &str, default: u64| -> anyhow::Result<Duration> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map(Duration::from_secs)
                    .with_context(|| format!("Invalid {}", key)),
                None => Ok(Duration::from_secs(default)),
            }
        };

        let defaults = AggregatorConfig::default();
        let max_concurrency = match lookup("CERP_MAX_CONCURRENCY") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("Invalid CERP_MAX_CONCURRENCY")?,
            None => defaults.max_concurrency,
        };

        let output = match lookup("CERP_OUTPUT") {
            Some(raw) => raw.parse()?,
            None => OutputFormat::Json,
        };

        Ok(Self {
            country,
            fetch_timeout: secs("CERP_FETCH_TIMEOUT_SECS", 10)?,
            aggregator: AggregatorConfig {
                source_timeout: secs("CERP_SOURCE_TIMEOUT_SECS", defaults.source_timeout.as_secs())?,
                slow_run_threshold: secs("CERP_SLOW_RUN_SECS", defaults.slow_run_threshold.as_secs())?,
                max_concurrency,
            },
            output,
        })
    }
}
