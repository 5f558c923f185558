// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use soulbound_onboard::{
    api::router,
    chain::SolanaRpc,
    config::{Config, LogFormat},
    state::AppState,
    storage::RedbProfileStore,
};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let store = RedbProfileStore::open(&config.data_dir.join("profiles.redb"))
        .expect("Failed to open profile database");
    let chain = SolanaRpc::new(config.rpc_url.clone());

    if config.mint_address.is_none() {
        tracing::warn!("NFT_MINT_ADDRESS is not set; mint execution is unavailable");
    }

    let state = AppState::new(
        Arc::new(store),
        Arc::new(chain),
        config.allowed_origins.clone(),
    );
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, rpc_url = %config.rpc_url, "onboarding server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
