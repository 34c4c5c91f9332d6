use alloy_primitives::{
    aliases::{I24, U24},
    keccak256, Address, B256,
};
use alloy_provider::{ProviderBuilder, RootProvider};
use alloy_sol_types::{sol, SolValue};
use anyhow::Context;
use async_trait::async_trait;

use super::{HookReader, ReadError};
use crate::models::PoolDefinition;

sol! {
    /// Uniswap v4 pool key. currency0 sorts numerically below currency1;
    /// the keccak of its ABI encoding is the contract's pool id.
    #[derive(Copy, Debug, Hash, PartialEq, Eq)]
    struct PoolKey {
        address currency0;
        address currency1;
        uint24 fee;
        int24 tickSpacing;
        address hooks;
    }

    #[sol(rpc)]
    contract DynamicFeeHook {
        function getCurrentFee(PoolKey calldata key) external view returns (uint24);
        function emergencyModeActive() external view returns (bool);
        function emergencyFee() external view returns (uint24);
        function owner() external view returns (address);
        function swapCount(bytes32 poolId) external view returns (uint256);
    }
}

/// Builds a pool key from plain integers, rejecting values that do not fit
/// the contract's uint24/int24 fields.
pub fn pool_key(
    currency0: Address,
    currency1: Address,
    fee: u32,
    tick_spacing: i32,
    hooks: Address,
) -> Result<PoolKey, ReadError> {
    let fee = U24::try_from(fee)
        .map_err(|_| ReadError::InvalidParams(format!("fee {fee} exceeds uint24")))?;
    let tick_spacing = I24::try_from(tick_spacing)
        .map_err(|_| ReadError::InvalidParams(format!("tick spacing {tick_spacing} exceeds int24")))?;
    Ok(PoolKey {
        currency0,
        currency1,
        fee,
        tickSpacing: tick_spacing,
        hooks,
    })
}

pub fn key_for(definition: &PoolDefinition, hooks: Address) -> Result<PoolKey, ReadError> {
    pool_key(
        definition.currency0,
        definition.currency1,
        definition.fee,
        definition.tick_spacing,
        hooks,
    )
}

/// Derives the pool id the way the pool manager does: keccak256 of the
/// ABI-encoded key (five fields, each padded to 32 bytes).
pub fn pool_id(key: &PoolKey) -> B256 {
    keccak256(key.abi_encode())
}

/// Read-only client for one network's hook deployment.
pub struct HookClient {
    provider: RootProvider,
    hook_address: Address,
}

impl HookClient {
    pub fn connect(rpc_url: &str, hook_address: Address) -> anyhow::Result<Self> {
        let url = rpc_url.parse().context("invalid rpc url")?;
        let provider = ProviderBuilder::default().connect_http(url);
        Ok(Self {
            provider,
            hook_address,
        })
    }
}

#[async_trait]
impl HookReader for HookClient {
    async fn current_fee(&self, key: &PoolKey) -> Result<u32, ReadError> {
        let hook = DynamicFeeHook::new(self.hook_address, self.provider.clone());
        let fee = hook.getCurrentFee(*key).call().await?;
        Ok(fee.to::<u32>())
    }

    async fn emergency_mode_active(&self) -> Result<bool, ReadError> {
        let hook = DynamicFeeHook::new(self.hook_address, self.provider.clone());
        Ok(hook.emergencyModeActive().call().await?)
    }

    async fn emergency_fee(&self) -> Result<u32, ReadError> {
        let hook = DynamicFeeHook::new(self.hook_address, self.provider.clone());
        let fee = hook.emergencyFee().call().await?;
        Ok(fee.to::<u32>())
    }

    async fn owner(&self) -> Result<Address, ReadError> {
        let hook = DynamicFeeHook::new(self.hook_address, self.provider.clone());
        Ok(hook.owner().call().await?)
    }

    async fn swap_count(&self, pool_id: B256) -> Result<u64, ReadError> {
        let hook = DynamicFeeHook::new(self.hook_address, self.provider.clone());
        let count = hook.swapCount(pool_id).call().await?;
        // A counter past u64::MAX is not a realistic pool; clamp instead of erroring.
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const HOOK: Address = address!("0787c1624420428c837ffcf35cf4b28fd342f0c0");
    const WETH: Address = address!("4200000000000000000000000000000000000006");
    const USDC: Address = address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913");

    #[test]
    fn pool_id_is_deterministic() {
        let a = pool_key(WETH, USDC, 3000, 60, HOOK).unwrap();
        let b = pool_key(WETH, USDC, 3000, 60, HOOK).unwrap();
        assert_eq!(pool_id(&a), pool_id(&b));
    }

    #[test]
    fn pool_id_depends_on_every_field() {
        let base = pool_key(WETH, USDC, 3000, 60, HOOK).unwrap();
        let other_fee = pool_key(WETH, USDC, 500, 60, HOOK).unwrap();
        let other_tick = pool_key(WETH, USDC, 3000, 10, HOOK).unwrap();
        let swapped = pool_key(USDC, WETH, 3000, 60, HOOK).unwrap();
        let no_hook = pool_key(WETH, USDC, 3000, 60, Address::ZERO).unwrap();

        let id = pool_id(&base);
        assert_ne!(id, pool_id(&other_fee));
        assert_ne!(id, pool_id(&other_tick));
        assert_ne!(id, pool_id(&swapped));
        assert_ne!(id, pool_id(&no_hook));
    }

    #[test]
    fn key_encodes_to_five_words() {
        // Standard (non-packed) ABI encoding: five fields, 32 bytes each.
        let key = pool_key(WETH, USDC, 3000, 60, HOOK).unwrap();
        assert_eq!(key.abi_encode().len(), 160);
    }

    #[test]
    fn negative_tick_spacing_is_representable() {
        let key = pool_key(WETH, USDC, 3000, -60, HOOK).unwrap();
        assert_ne!(
            pool_id(&key),
            pool_id(&pool_key(WETH, USDC, 3000, 60, HOOK).unwrap())
        );
    }

    #[test]
    fn oversized_fee_is_rejected() {
        assert!(pool_key(WETH, USDC, 1 << 24, 60, HOOK).is_err());
    }
}
