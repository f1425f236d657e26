//! ubi-gateway server entry point.
//!
//! Starts the Axum HTTP server exposing UBI claim verification.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use ubi_gateway::api;
use ubi_gateway::app_state::AppState;
use ubi_gateway::chain::JsonRpcClient;
use ubi_gateway::config::GatewayConfig;
use ubi_gateway::domain::{ContractSet, ResultCache};
use ubi_gateway::service::VerificationService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        addr = %config.listen_addr,
        rpc_url = %config.rpc_url,
        chain_id = config.contracts.chain_id,
        ubi_proxy = %config.contracts.ubi_proxy,
        token = %config.contracts.token,
        "starting ubi-gateway"
    );

    let mismatched = ContractSet::audit_event_table();
    tracing::info!(mismatched = mismatched.len(), "event table audited");

    // Build chain and domain layers
    let rpc = Arc::new(JsonRpcClient::with_timeouts(
        &config.rpc_url,
        config.rpc_timeout,
        config.log_query_timeout,
    ));
    let cache = Arc::new(ResultCache::new(
        config.cache_ttl_secs,
        config.cache_max_entries,
    ));

    // Build service layer
    let verifier = VerificationService::new(rpc, cache, config.verifier_settings());

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(verifier));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
