mod config;
mod output;

use std::sync::Arc;

use anyhow::Context;
use cerp_rates::{default_registry, Aggregator, HttpFetcher};
use config::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let log_format = std::env::var("CERP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("CERP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    });
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries only the snapshot.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let fetcher = Arc::new(HttpFetcher::with_timeout(config.fetch_timeout));
    let registry = default_registry(fetcher)?;
    let aggregator = Aggregator::new(config.aggregator.clone());

    tracing::info!("Collecting rates for '{}'", config.country);
    let snapshot = aggregator
        .collect(&registry, config.country)
        .await
        .with_context(|| format!("Collection failed for '{}'", config.country))?;

    let document = output::render(&snapshot, config.output)?;
    println!("{}", document);
    Ok(())
}
