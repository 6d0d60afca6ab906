mod app;
mod form;

use std::{
    fs::{self, OpenOptions},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use shopledger_core::{
    config::{self, AppConfig},
    Session,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config::ensure_default_config()?;
    let config = AppConfig::load_from(&config_path)?;
    init_logging(&config.log_dir)?;
    tracing::info!(
        config = %config_path.display(),
        data_file = %config.data_file.display(),
        log_dir = %config.log_dir.display(),
        "starting shopledger"
    );

    let session = Session::open(config.store())
        .with_context(|| format!("failed to load catalog {}", config.data_file.display()))?;

    let mut app = app::ShopApp::new(session);
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!(?err, "shopledger exited with an error");
    }
    result
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("shopledger.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal UI owns stdout, so everything goes to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
