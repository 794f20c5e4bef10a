//! File logging.
//!
//! Log events go to `${T4B_HOME}/logs/t4b.log` (rotated daily) so the
//! terminal stays reserved for command output. The filter comes from
//! `T4B_LOG` when set, otherwise from `log_level` in the config.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Config, paths};

/// Environment variable holding a filter directive that overrides the config.
pub const LOG_ENV: &str = "T4B_LOG";

const LOG_FILE_PREFIX: &str = "t4b.log";

/// Installs the global subscriber writing to the default logs directory.
///
/// The returned guard flushes pending events on drop; keep it alive for the
/// lifetime of the process.
///
/// # Errors
/// Returns an error if the logs directory cannot be created or the filter
/// directive is invalid.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), config)
}

/// Same as [`init`] but writes to `dir`.
///
/// Installing twice in one process is not an error; the first subscriber
/// stays in place.
///
/// # Errors
/// Returns an error if `dir` cannot be created or the filter is invalid.
pub fn init_in(dir: &Path, config: &Config) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory {}", dir.display()))?;

    let filter = filter_for(config)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let fmt_layer = fmt::layer().with_writer(writer).with_ansi(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("global subscriber already installed");
    }

    Ok(guard)
}

fn filter_for(config: &Config) -> Result<EnvFilter> {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("Invalid log level '{}'", config.log_level))
}
