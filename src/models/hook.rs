use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use super::pool::{PoolDefinition, PoolSnapshot};

/// Headline hook/network metadata a client needs before touching the pools.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookInfo {
    pub network: String,
    pub hook_address: Address,
    pub pool_manager_address: Address,
    pub position_manager_address: Address,
    pub permit2_address: Address,
    pub explorer_url: String,
    /// Current hook owner, when the read succeeded.
    pub owner: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub supported_pools: Vec<PoolDefinition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyStatus {
    pub network: String,
    pub is_active: bool,
    pub emergency_fee: u32,
    pub formatted_emergency_fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStatus {
    pub address: Address,
    pub owner: Option<Address>,
    pub is_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    pub fee: u32,
    pub formatted_fee: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapCountInfo {
    pub pool_id: B256,
    pub swap_count: u64,
}

/// Wire echo of a v4 pool key, with plain integer fee/tick fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolKeyInfo {
    pub currency0: Address,
    pub currency1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCreationEstimate {
    pub exists: bool,
    pub pool_id: B256,
    pub pool_key: PoolKeyInfo,
    pub estimated_gas: String,
    pub hook_address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// ERC-20 metadata as served by /api/token-info and held in the token cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub chain: String,
}

/// Envelope for the pool list. `error` is only set when the whole network
/// was unreachable and every snapshot was built from fallbacks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfoResponse {
    pub network: String,
    pub pools: Vec<PoolSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
