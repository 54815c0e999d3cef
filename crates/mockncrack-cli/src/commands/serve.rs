//! Serve command
//!
//! Wires store, generator, ledger and gate together and runs the HTTP API
//! until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tokio::net::TcpListener;

use mockncrack_core::auth::JwtKeys;
use mockncrack_core::{
    CredentialRotator, GeminiQuestionGenerator, QuestionSourcer, SqliteQuestionStore,
    SqliteTokenLedger, TokenGate,
};

use super::Context;
use crate::api::{create_router, AppState};
use crate::output;

pub async fn execute(ctx: &Context, bind: Option<String>) -> Result<()> {
    let config = &ctx.config;
    let keys = JwtKeys::new(config.require_jwt_secret()?);

    if config.generator.keys.is_empty() {
        output::warn("No GEMINI_KEY_<n> configured; only stored questions can be served");
    }

    let rotator = Arc::new(CredentialRotator::new(config.generator.keys.clone()));
    let generator = GeminiQuestionGenerator::new(&config.generator, rotator)?;
    let store = SqliteQuestionStore::new(ctx.db.pool.clone());
    let ledger = SqliteTokenLedger::new(ctx.db.pool.clone());

    let sourcer = QuestionSourcer::new(Arc::new(store), Arc::new(generator));
    let gate = TokenGate::new(Arc::new(ledger), sourcer);

    let app = create_router(AppState::new(gate, keys, config.mode));

    let addr = bind.unwrap_or_else(|| config.bind.clone());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!(
        "[serve] Listening on {} ({} mode, {} generation credentials)",
        addr,
        config.mode,
        config.generator.keys.len()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("[serve] Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("[serve] Failed to listen for shutdown signal: {}", e);
    }
}
