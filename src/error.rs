//! Application-wide error types.
//!
//! `AppError` covers the fatal startup path (config, logger, socket bind).
//! Recoverable failures — provider calls, search, file parsing, speech — have
//! their own error types next to the code that produces them and are folded
//! into user-visible strings, never into `AppError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
