use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use alloy_primitives::Address;

use crate::networks;
use crate::services::{PoolAggregator, TokenDirectory};
use crate::sources::ReadError;

pub struct AppState {
    pub aggregator: Arc<PoolAggregator>,
    pub tokens: Arc<TokenDirectory>,
    pub default_network: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/uniswap", get(uniswap_get).post(uniswap_post))
        .route("/api/token-info", get(token_info))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .with_state(state)
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn internal_error(error: impl std::fmt::Display) -> Response {
    tracing::error!("request failed: {error}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}

/// Pulls the four pool-key parameters out of a query/body map.
fn pool_params(params: &HashMap<String, String>) -> Result<(Address, Address, u32, i32), &'static str> {
    let currency0 = params.get("currency0").ok_or("Missing pool parameters")?;
    let currency1 = params.get("currency1").ok_or("Missing pool parameters")?;
    let fee = params.get("fee").ok_or("Missing pool parameters")?;
    let tick_spacing = params.get("tickSpacing").ok_or("Missing pool parameters")?;

    Ok((
        currency0.parse().map_err(|_| "Invalid pool parameters")?,
        currency1.parse().map_err(|_| "Invalid pool parameters")?,
        fee.parse().map_err(|_| "Invalid pool parameters")?,
        tick_spacing.parse().map_err(|_| "Invalid pool parameters")?,
    ))
}

/// GET /api/uniswap?action=...&network=...
async fn uniswap_get(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let action = params.get("action").map(String::as_str).unwrap_or_default();
    let network = params
        .get("network")
        .map(String::as_str)
        .unwrap_or(&state.default_network);

    match action {
        "getHookInfo" => Json(state.aggregator.hook_info(network).await).into_response(),
        "getPoolInfo" => Json(state.aggregator.pool_info(network).await).into_response(),
        "getEmergencyStatus" => {
            Json(state.aggregator.emergency_status(network).await).into_response()
        }
        "getOwnerStatus" => {
            let Some(address) = params.get("address") else {
                return bad_request("Missing address parameter");
            };
            match address.parse::<Address>() {
                Ok(address) => {
                    Json(state.aggregator.owner_status(network, address).await).into_response()
                }
                Err(_) => bad_request("Invalid address format"),
            }
        }
        "getCurrentFee" => {
            let (currency0, currency1, fee, tick_spacing) = match pool_params(&params) {
                Ok(parts) => parts,
                Err(message) => return bad_request(message),
            };
            match state
                .aggregator
                .current_fee(network, currency0, currency1, fee, tick_spacing)
                .await
            {
                Ok(quote) => Json(quote).into_response(),
                Err(e) => internal_error(e),
            }
        }
        "getSwapCount" => {
            let (currency0, currency1, fee, tick_spacing) = match pool_params(&params) {
                Ok(parts) => parts,
                Err(message) => return bad_request(message),
            };
            match state
                .aggregator
                .swap_count(network, currency0, currency1, fee, tick_spacing)
                .await
            {
                Ok(count) => Json(count).into_response(),
                Err(e) => internal_error(e),
            }
        }
        _ => bad_request("Invalid action"),
    }
}

/// POST /api/uniswap with {action, ...}. Only the read-only creation probe is
/// served; write actions are rejected toward a client-held wallet.
async fn uniswap_post(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let action = body.get("action").and_then(Value::as_str).unwrap_or_default();

    match action {
        "estimatePoolCreation" => {
            let network = body
                .get("network")
                .and_then(Value::as_str)
                .unwrap_or(&state.default_network);
            let Some((currency0, currency1, fee, tick_spacing)) = estimate_params(&body) else {
                return bad_request("Missing pool parameters");
            };
            match state
                .aggregator
                .estimate_pool_creation(network, currency0, currency1, fee, tick_spacing)
                .await
            {
                Ok(estimate) => Json(estimate).into_response(),
                Err(e @ ReadError::InvalidParams(_)) => bad_request(&e.to_string()),
                Err(e) => internal_error(e),
            }
        }
        "setEmergencyMode" | "updatePoolFee" => Json(json!({
            "success": false,
            "message": "This endpoint is read-only. Submit the transaction from a connected wallet."
        }))
        .into_response(),
        _ => bad_request("Invalid action"),
    }
}

fn estimate_params(body: &Value) -> Option<(Address, Address, u32, i32)> {
    let currency0 = body.get("currency0")?.as_str()?.parse().ok()?;
    let currency1 = body.get("currency1")?.as_str()?.parse().ok()?;
    let fee = value_as_u32(body.get("fee"))?;
    let tick_spacing = value_as_i32(body.get("tickSpacing"))?;
    Some((currency0, currency1, fee, tick_spacing))
}

// The original clients sent fee/tickSpacing as either numbers or strings.
fn value_as_u32(value: Option<&Value>) -> Option<u32> {
    let value = value?;
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn value_as_i32(value: Option<&Value>) -> Option<i32> {
    let value = value?;
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// GET /api/token-info?address=...&network=...
async fn token_info(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(address) = params.get("address") else {
        return bad_request("Invalid address format");
    };
    let Ok(address) = address.parse::<Address>() else {
        return bad_request("Invalid address format");
    };
    let network = params
        .get("network")
        .map(String::as_str)
        .unwrap_or(&state.default_network);

    Json(state.tokens.lookup(network, address).await).into_response()
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

/// GET /stats
async fn stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    let stats = state.aggregator.stats();
    Json(json!({
        "networks": networks::NETWORKS.len(),
        "cachedTokens": state.tokens.cache_len(),
        "totalRequests": stats.total_requests.load(Ordering::Relaxed),
        "chainReads": stats.chain_reads.load(Ordering::Relaxed),
        "readFailures": stats.read_failures.load(Ordering::Relaxed),
    }))
}
