pub mod gecko;
pub mod hook;
pub mod token;

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use thiserror::Error;

use self::hook::PoolKey;
use self::token::TokenMetadata;

/// A failed read against a contract. Each call is one-shot; callers decide
/// whether to degrade to a fallback or surface the error.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("contract read failed: {0}")]
    Contract(String),
    #[error("invalid pool parameters: {0}")]
    InvalidParams(String),
    #[error("no rpc connection for network {0}")]
    NoConnection(String),
}

impl From<alloy_contract::Error> for ReadError {
    fn from(e: alloy_contract::Error) -> Self {
        ReadError::Contract(e.to_string())
    }
}

/// A failed fetch against a vendor REST API.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("rate limited")]
    RateLimit,
    #[error("not found")]
    NotFound,
}

/// Read-only view of the dynamic-fee hook contract.
#[async_trait]
pub trait HookReader: Send + Sync {
    async fn current_fee(&self, key: &PoolKey) -> Result<u32, ReadError>;
    async fn emergency_mode_active(&self) -> Result<bool, ReadError>;
    async fn emergency_fee(&self) -> Result<u32, ReadError>;
    async fn owner(&self) -> Result<Address, ReadError>;
    async fn swap_count(&self, pool_id: B256) -> Result<u64, ReadError>;
}

/// ERC-20 metadata lookup. Infallible: unreadable fields come back as
/// defaults with `resolved` unset.
#[async_trait]
pub trait TokenReader: Send + Sync {
    async fn token_metadata(&self, address: Address) -> TokenMetadata;
}

/// 24h volume for a token's most liquid pool, from a market-data vendor.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn token_volume_24h(&self, gecko_network: &str, token: Address)
        -> Result<f64, SourceError>;
}
