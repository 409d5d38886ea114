use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use progress_core::Phase;
use progress_engine::{start_with, ReqwestEventSource};
use progress_logging::progress_info;

use super::config::{load_config, DEFAULT_CONFIG_FILENAME};
use super::logging::{self, LogDestination};
use super::ui::render::TerminalScreen;

/// Follow a scan/download progress stream until it completes or fails.
#[derive(Debug, Parser)]
#[command(name = "progress-monitor", version)]
pub struct Cli {
    /// Progress stream endpoint, overriding the config file.
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Path to the RON config file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,
    /// Where log output goes, overriding the config file.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,
    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(&cli.config)?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(destination) = cli.log {
        config.log_destination = destination;
    }
    let level = if cli.verbose || config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(config.log_destination, level);
    progress_info!("Starting progress monitor for {}", config.endpoint);

    let settings = config.stream_settings();
    let screen = TerminalScreen::new();
    let mut handle = start_with(
        &config.endpoint,
        screen.bindings(),
        settings.clone(),
        Arc::new(ReqwestEventSource::new(settings)),
    )
    .with_context(|| format!("could not start monitor for {}", config.endpoint))?;
    handle.wait();

    let view = handle.view();
    match view.phase {
        Phase::Complete => {
            progress_info!(
                "Scan complete: {} messages scanned, results at {:?}",
                view.scanned_count.unwrap_or_default(),
                screen.results()
            );
            Ok(())
        }
        Phase::Error => bail!(
            "scan failed: {}",
            view.last_error.as_deref().unwrap_or("unknown error")
        ),
        Phase::Disconnected => bail!("lost connection to {}", config.endpoint),
        phase => bail!("monitor stopped while {:?}", phase),
    }
}
