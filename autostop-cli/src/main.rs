//! autostop — stop a SageMaker notebook instance once it has been idle
//!
//! Intended to be run periodically (cron or a lifecycle timer). Each run
//! makes one decision and exits.

use autostop_cli::args::EXIT_USAGE;
use autostop_cli::parse_args;
use autostop_core::config::{RunConfig, Settings};
use autostop_core::{run_once, AwsPlatform, JupyterClient};
use chrono::Utc;
use tracing_subscriber::{fmt, EnvFilter};

async fn run(config: RunConfig) -> anyhow::Result<()> {
    let jupyter = JupyterClient::new(config.port, &config.settings.jupyter)?;
    let platform = AwsPlatform::from_env(&config.settings.aws).await;

    tracing::debug!(
        url = jupyter.base_url(),
        threshold_secs = config.threshold.as_secs(),
        ignore_connections = config.ignore_connections,
        "Checking notebook idleness"
    );

    let report = run_once(&config, &jupyter, &platform, Utc::now()).await?;
    tracing::debug!(
        source = ?report.source,
        decision = ?report.decision,
        actions = report.actions.len(),
        "Autostop pass complete"
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    let invocation = match parse_args(std::env::args_os()) {
        Ok(i) => i,
        Err(e) => {
            e.report();
            std::process::exit(e.exit_code());
        }
    };

    // Load settings file if one was given
    let settings = match invocation.config.as_deref() {
        Some(path) => match Settings::load(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("autostop: failed to load config from {}: {}", path, e);
                std::process::exit(EXIT_USAGE);
            }
        },
        None => Settings::default(),
    };

    // Init logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.service.log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = run(invocation.into_run_config(settings)).await {
        eprintln!("autostop: {:#}", e);
        std::process::exit(1);
    }
}
