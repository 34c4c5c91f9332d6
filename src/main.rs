mod api;
mod config;
mod models;
mod networks;
mod services;
mod sources;

use std::collections::HashMap;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::Config;
use services::{PoolAggregator, TokenCache, TokenDirectory};
use sources::gecko::GeckoTerminal;
use sources::hook::HookClient;
use sources::token::Erc20Client;
use sources::{HookReader, TokenReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hook_gatherer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🚀 Dynamic Fee Hook Gatherer Starting...\n");

    let config = Config::load()?;
    tracing::info!("✓ Configuration loaded");

    // One read-only client per configured network. A network whose RPC client
    // cannot be built is skipped; its requests degrade to fallbacks.
    let mut hook_readers: HashMap<String, Arc<dyn HookReader>> = HashMap::new();
    let mut token_readers: HashMap<String, Arc<dyn TokenReader>> = HashMap::new();
    for network in networks::NETWORKS.values() {
        let rpc_url = network.rpc_url();
        match HookClient::connect(&rpc_url, network.hook_address) {
            Ok(client) => {
                hook_readers.insert(network.key.to_string(), Arc::new(client));
            }
            Err(e) => tracing::warn!("✗ {}: hook client unavailable: {e}", network.key),
        }
        match Erc20Client::connect(&rpc_url) {
            Ok(client) => {
                token_readers.insert(network.key.to_string(), Arc::new(client));
            }
            Err(e) => tracing::warn!("✗ {}: token client unavailable: {e}", network.key),
        }
    }
    tracing::info!(
        "✓ {}/{} network clients ready",
        hook_readers.len(),
        networks::NETWORKS.len()
    );

    let aggregator = Arc::new(PoolAggregator::new(
        hook_readers,
        Arc::new(GeckoTerminal::new()),
    ));
    let tokens = Arc::new(TokenDirectory::new(
        token_readers,
        TokenCache::with_common_tokens(),
    ));

    let state = Arc::new(AppState {
        aggregator,
        tokens,
        default_network: config.gatherer.default_network.clone(),
    });

    let app = api::create_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    println!("\n✓ Server ready on http://{}\n", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
