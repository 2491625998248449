use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::args::Cli;

/// `-d` wins over `-v`; quiet runs only show warnings.
pub fn level_from_cli(cli: &Cli) -> tracing::Level {
    if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    }
}

/// Filter for our own events. `RUST_LOG` still applies to everything else.
fn filter_for(level: tracing::Level) -> Result<EnvFilter> {
    let directive = format!("vhostcrawler={}", level)
        .parse()
        .with_context(|| format!("invalid log directive for level {}", level))?;
    Ok(EnvFilter::from_default_env()
        .add_directive(directive)
        .add_directive(tracing::Level::WARN.into()))
}

/// Install the stderr subscriber so logs never tear the progress bar on
/// stdout. Returns `false` when a subscriber is already installed, which
/// happens when several runs share one process.
pub fn init(level: tracing::Level) -> Result<bool> {
    let installed = tracing_subscriber::registry()
        .with(filter_for(level)?)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    match installed {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::debug!("Keeping the existing log subscriber: {}", e);
            Ok(false)
        }
    }
}
