use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "vcon_search=warn";

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for results
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    vcon_search::cli::run()
}
