//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level so a single run can be
//! inspected without touching the config file.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global fmt subscriber at `level`. Call once at startup.
pub fn init(level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::Logger(format!("invalid log level {level:?}: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logger(e.to_string()))
}
