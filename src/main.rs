//! Research assistant service — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at configured level
//!   4. Build providers (fatal if a required API key is missing)
//!   5. Serve the form UI and API until ctrl-c

use std::sync::Arc;

use tracing::info;

use researcher_bot::compose::Composer;
use researcher_bot::error::AppError;
use researcher_bot::speech::{SpeechController, SpeechEngine};
use researcher_bot::{config, llm, logger, search, web};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    info!(
        service = %config.service_name,
        log_level = %config.log_level,
        llm = %config.llm.provider,
        search = %config.search.provider,
        speech = %config.speech.engine,
        "config loaded"
    );

    let llm = llm::providers::build(&config.llm, config.llm_api_key.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;
    let search = search::build(&config.search)
        .map_err(|e| AppError::Config(e.to_string()))?;
    let engine = SpeechEngine::build(&config.speech)
        .map_err(|e| AppError::Config(e.to_string()))?;

    let state = Arc::new(web::AppState::new(
        Composer::new(search, llm),
        SpeechController::new(engine),
    ));

    let listener = tokio::net::TcpListener::bind(&config.http.bind)
        .await
        .map_err(|e| AppError::Http(format!("bind failed on {}: {e}", config.http.bind)))?;
    info!(bind = %config.http.bind, "http surface listening");

    axum::serve(listener, web::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Http(e.to_string()))?;

    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
