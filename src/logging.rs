use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "info,eventfeed_core=debug" } else { "info" };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;

    Ok(())
}
