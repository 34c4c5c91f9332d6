use alloy_primitives::Address;
use alloy_provider::{ProviderBuilder, RootProvider};
use alloy_sol_types::sol;
use anyhow::Context;
use async_trait::async_trait;

use super::TokenReader;

sol! {
    #[sol(rpc)]
    contract Erc20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

/// Result of an ERC-20 metadata lookup. Fields the contract would not serve
/// carry defaults; `resolved` is set when at least one read succeeded.
#[derive(Debug, Clone)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub resolved: bool,
}

impl TokenMetadata {
    pub fn unknown() -> Self {
        Self {
            name: "Unknown Token".to_string(),
            symbol: "UNKNOWN".to_string(),
            decimals: 18,
            resolved: false,
        }
    }
}

/// Read-only ERC-20 client for one network.
pub struct Erc20Client {
    provider: RootProvider,
}

impl Erc20Client {
    pub fn connect(rpc_url: &str) -> anyhow::Result<Self> {
        let url = rpc_url.parse().context("invalid rpc url")?;
        let provider = ProviderBuilder::default().connect_http(url);
        Ok(Self { provider })
    }
}

#[async_trait]
impl TokenReader for Erc20Client {
    async fn token_metadata(&self, address: Address) -> TokenMetadata {
        let token = Erc20::new(address, self.provider.clone());
        let name_call = token.name();
        let symbol_call = token.symbol();
        let decimals_call = token.decimals();
        let (name, symbol, decimals) = tokio::join!(
            name_call.call(),
            symbol_call.call(),
            decimals_call.call(),
        );

        let resolved = name.is_ok() || symbol.is_ok() || decimals.is_ok();
        let fallback = TokenMetadata::unknown();
        TokenMetadata {
            name: name.unwrap_or(fallback.name),
            symbol: symbol.unwrap_or(fallback.symbol),
            decimals: decimals.unwrap_or(fallback.decimals),
            resolved,
        }
    }
}
