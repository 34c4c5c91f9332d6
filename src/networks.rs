use alloy_primitives::{address, Address};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::env;

use crate::models::PoolDefinition;

/// Network served when the requested key is unrecognized.
pub const DEFAULT_NETWORK: &str = "base";

/// Canonical Permit2, same deterministic address on every chain.
const PERMIT2_ADDRESS: Address = address!("000000000022d473030f116ddee9f6b43ac78ba3");

/// The dynamic-fee hook is deployed via CREATE2 to the same address on every
/// supported network.
const HOOK_ADDRESS: Address = address!("0787c1624420428c837ffcf35cf4b28fd342f0c0");

/// Everything the gatherer knows about one network. Immutable after startup.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub key: &'static str,
    pub chain_name: &'static str,
    default_rpc_url: &'static str,
    /// Env var that overrides the RPC endpoint for this network.
    rpc_env: &'static str,
    /// Network id used by the GeckoTerminal API.
    pub gecko_network: &'static str,
    pub hook_address: Address,
    pub pool_manager_address: Address,
    pub position_manager_address: Address,
    pub permit2_address: Address,
    pub explorer_url: &'static str,
    pub supported_pools: Vec<PoolDefinition>,
}

impl NetworkConfig {
    pub fn rpc_url(&self) -> String {
        env::var(self.rpc_env).unwrap_or_else(|_| self.default_rpc_url.to_string())
    }
}

#[allow(clippy::too_many_arguments)]
fn pool(
    name: &str,
    currency0: Address,
    currency1: Address,
    fee: u32,
    tick_spacing: i32,
    token0_symbol: &str,
    token1_symbol: &str,
    token0_decimals: u8,
    token1_decimals: u8,
    fallback_volume_usd: f64,
) -> PoolDefinition {
    PoolDefinition {
        name: name.to_string(),
        currency0,
        currency1,
        fee,
        tick_spacing,
        token0_symbol: token0_symbol.to_string(),
        token1_symbol: token1_symbol.to_string(),
        token0_decimals,
        token1_decimals,
        fallback_volume_usd,
    }
}

lazy_static! {
    pub static ref NETWORKS: HashMap<&'static str, NetworkConfig> = {
        let mut networks = HashMap::new();

        networks.insert(
            "base",
            NetworkConfig {
                key: "base",
                chain_name: "Base Mainnet",
                default_rpc_url: "https://mainnet.base.org",
                rpc_env: "BASE_RPC_URL",
                gecko_network: "base",
                hook_address: HOOK_ADDRESS,
                pool_manager_address: address!("498581ff718922c3f8e6a244956af099b2652b2b"),
                position_manager_address: address!("4b2c77d209d3405f41a037ec6c77f7f5b8e2ca80"),
                permit2_address: PERMIT2_ADDRESS,
                explorer_url: "https://basescan.org",
                supported_pools: vec![
                    pool(
                        "ETH/USDC",
                        address!("4200000000000000000000000000000000000006"),
                        address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
                        3000,
                        60,
                        "WETH",
                        "USDC",
                        18,
                        6,
                        1_250_000.0,
                    ),
                    pool(
                        "ETH/DEGEN",
                        address!("4200000000000000000000000000000000000006"),
                        address!("4ed4e862860bed51a9570b96d89af5e1b0efefed"),
                        3000,
                        60,
                        "WETH",
                        "DEGEN",
                        18,
                        18,
                        85_000.0,
                    ),
                ],
            },
        );

        networks.insert(
            "celo",
            NetworkConfig {
                key: "celo",
                chain_name: "Celo Alfajores",
                default_rpc_url: "https://alfajores-forno.celo-testnet.org",
                rpc_env: "CELO_RPC_URL",
                gecko_network: "celo",
                hook_address: HOOK_ADDRESS,
                pool_manager_address: address!("498581ff718922c3f8e6a244956af099b2652b2b"),
                position_manager_address: address!("4b2c77d209d3405f41a037ec6c77f7f5b8e2ca80"),
                permit2_address: PERMIT2_ADDRESS,
                explorer_url: "https://alfajores.celoscan.io",
                supported_pools: vec![pool(
                    "cUSD/CELO",
                    address!("874069fa1eb16d44d622f2e0ca25eea172369bc1"),
                    address!("f194afdf50b03e69bd7d057c1aa9e10c9954e4c9"),
                    3000,
                    60,
                    "cUSD",
                    "CELO",
                    18,
                    18,
                    12_000.0,
                )],
            },
        );

        networks.insert(
            "ethereum",
            NetworkConfig {
                key: "ethereum",
                chain_name: "Sepolia Testnet",
                default_rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
                rpc_env: "SEPOLIA_RPC_URL",
                gecko_network: "eth",
                hook_address: HOOK_ADDRESS,
                pool_manager_address: address!("e03a1074c86cfedd5c142c4f04f1a1536e203543"),
                position_manager_address: address!("429ba70a577f5b8ecde1e05a2a0f91ede9c400cc"),
                permit2_address: PERMIT2_ADDRESS,
                explorer_url: "https://sepolia.etherscan.io",
                supported_pools: vec![pool(
                    "USDC/WETH",
                    address!("1c7d4b196cb0c7b01d743fbc6116a902379c7238"),
                    address!("7af963cf6d228e564e2a0aa0ddbf06210b38615d"),
                    500,
                    10,
                    "USDC",
                    "WETH",
                    6,
                    18,
                    40_000.0,
                )],
            },
        );

        networks
    };
}

/// Looks up a network by key, falling back to the default network for
/// anything unrecognized.
pub fn resolve(key: &str) -> &'static NetworkConfig {
    NETWORKS.get(key).unwrap_or(&NETWORKS[DEFAULT_NETWORK])
}
