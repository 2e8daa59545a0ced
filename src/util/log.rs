use std::{path::PathBuf, sync::Mutex};

use color_eyre::eyre::{Result, eyre};
use directories::ProjectDirs;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "velovolume.log";

pub fn log_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "velovolume", "velovolume")
        .ok_or_else(|| eyre!("failed to resolve data directory"))?;
    Ok(dirs.data_local_dir().to_path_buf())
}

/// The dashboard owns the terminal, so logs go to a file unless running
/// headless.
pub fn initialize_logging(headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    if headless {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()?;
        return Ok(());
    }

    let dir = log_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    registry
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()?;
    Ok(())
}
