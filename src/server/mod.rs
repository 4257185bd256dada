//! HTTP server exposing the dashboard's JSON API and the review action.

pub mod controller;
pub mod error;
pub mod model;
pub mod router;

use std::sync::Arc;

use crate::{
    chain::Chain,
    config::Config,
    error::Result,
    service::{MovieService, RewardSettings},
};

use model::AppState;

/// Wires the service described by `config` over the given chain.
pub fn build_service(config: &Config, chain: Arc<dyn Chain>) -> Result<MovieService> {
    let service = MovieService::new(chain, config.program_id()?).with_rewards(RewardSettings {
        mint: config.reward_mint()?,
        decimals: config.rewards.decimals,
        attach_accounts: config.rewards.enabled,
    });

    Ok(service)
}

pub fn build_state(config: &Config, service: MovieService) -> AppState {
    AppState {
        service,
        cluster: config.cluster,
        action_icon: config.action.icon.clone(),
    }
}

pub async fn serve(config: &Config, service: MovieService) -> anyhow::Result<()> {
    let app = router::app(build_state(config, service));

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
