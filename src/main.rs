// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Process bootstrap: load .env, initialize logging, resolve configuration
// once, build the provider registry and router, and serve.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use fanout_gateway::application::Dispatcher;
use fanout_gateway::infrastructure::config::GatewayConfig;
use fanout_gateway::infrastructure::llm::ProviderRegistry;
use fanout_gateway::presentation::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine in containerized deployments; the environment is
    // the source of truth either way.
    let _ = dotenvy::dotenv();

    init_logging()?;

    let config = Arc::new(GatewayConfig::from_env()?);
    let registry = Arc::new(ProviderRegistry::from_config(&config));
    let dispatcher = Dispatcher::new(registry);

    let state = Arc::new(AppState {
        config: config.clone(),
        dispatcher,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "gateway listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app(state))
        .await
        .context("server error")?;

    Ok(())
}

/// Initialize tracing subscriber for logging
fn init_logging() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
