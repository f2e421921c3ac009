//! # Day/Night Clock Application Entry Point
//!
//! This binary wires the configuration, the geolocation provider, the OpenCage
//! client and the terminal surface into an [`App`] and runs it until Ctrl-C.
//!
//! ```text
//! daynight-clock [--config <path>] [--once]
//! ```
//!
//! `--once` prints frames without clearing the screen and exits as soon as the
//! location branch settles, or after a short grace period.

use anyhow::Context;
use std::env;
use std::time::Duration;
use tracing::info;

use daynight_clock_lib::{
    app::{App, TerminalSurface},
    config::Config,
    geocoder::OpenCageClient,
    geolocation::provider_from_config,
};

/// How long `--once` waits for the location branch before giving up
const ONCE_GRACE: Duration = Duration::from_secs(15);

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    /// Explicit config file; `None` means clock-config.toml in the working directory
    config_path: Option<String>,
    once: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> anyhow::Result<Args> {
    let mut parsed = Args {
        config_path: None,
        once: false,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                parsed.config_path = Some(args.next().context("--config needs a path")?);
            }
            "--once" => parsed.once = true,
            other => anyhow::bail!("unknown argument: {}", other),
        }
    }
    Ok(parsed)
}

fn init_logging() {
    // stderr keeps log lines out of the frame drawn on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daynight_clock=warn,daynight_clock_lib=warn".into()),
        )
        .init();
}

/// Main application entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = parse_args(env::args().skip(1))?;

    let config = match &args.config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    if config.api_key().is_none() {
        info!(
            variable = %config.geocoder.api_key_env,
            "no geocoder API key set, address lookups will fail"
        );
    }

    let provider = provider_from_config(&config);
    let geocoder = OpenCageClient::from_config(&config);
    let width = config.display.width;

    let state = if args.once {
        let mut app = App::new(config, provider, geocoder, TerminalSurface::appending(width))
            .exit_when_settled(true);
        app.run(async {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = tokio::time::sleep(ONCE_GRACE) => {}
            }
        })
        .await?
    } else {
        let mut app = App::new(config, provider, geocoder, TerminalSurface::new(width));
        app.run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?
    };

    info!(theme = ?state.theme, "display torn down");
    Ok(())
}
