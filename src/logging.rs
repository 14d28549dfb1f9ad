//! Logger initialization.
//!
//! Everything in the crate logs through the `log` facade. This module installs a `fern`
//! dispatcher writing timestamped lines to stderr and, optionally, to a file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: log::LevelFilter,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: log::LevelFilter::Info,
            file: None,
        }
    }
}

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs the global logger. Calls after the first successful one do nothing.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if INITIALIZED.load(Ordering::Acquire) {
        return Ok(());
    }

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.level)
        .chain(std::io::stderr());

    if let Some(path) = &config.file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    INITIALIZED.store(true, Ordering::Release);

    log::debug!("Logging initialized at level {}", config.level);
    Ok(())
}
