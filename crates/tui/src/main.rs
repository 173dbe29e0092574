mod app;
mod client;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    tracing::info!(base_url = %config.base_url, "starting finboard");

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}

/// Logs go to a file: the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config.log_level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

/// A bare level applies to this workspace's crates; a full directive is used
/// as is.
fn log_filter(level: &str) -> Result<EnvFilter> {
    let directive = if level.contains('=') {
        level.to_string()
    } else {
        format!("finboard={level},engine={level}")
    };
    EnvFilter::try_new(directive).map_err(|err| AppError::Logging(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_targets_workspace_crates() {
        let filter = log_filter("debug").unwrap().to_string();
        assert!(filter.contains("finboard=debug"));
        assert!(filter.contains("engine=debug"));
    }

    #[test]
    fn bad_directive_is_an_error() {
        assert!(log_filter("finboard=loud").is_err());
    }
}
