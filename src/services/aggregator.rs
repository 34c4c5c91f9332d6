use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::Address;
use futures::future::join_all;

use crate::models::{
    format_fee_percentage, EmergencyStatus, FeeQuote, HookInfo, OwnerStatus, PoolCreationEstimate,
    PoolDefinition, PoolInfoResponse, PoolKeyInfo, PoolSnapshot, Reading, SwapCountInfo,
};
use crate::networks::{self, NetworkConfig};
use crate::sources::hook::{key_for, pool_id, pool_key};
use crate::sources::{HookReader, MarketDataSource, ReadError};

#[derive(Debug, Default)]
pub struct AggregatorStats {
    pub total_requests: AtomicU64,
    pub chain_reads: AtomicU64,
    pub read_failures: AtomicU64,
}

/// Assembles per-network pool snapshots from chain reads, market data and the
/// static tables. Every operation returns a well-formed response; upstream
/// failures degrade individual fields to their configured fallbacks.
pub struct PoolAggregator {
    readers: HashMap<String, Arc<dyn HookReader>>,
    market: Arc<dyn MarketDataSource>,
    stats: AggregatorStats,
}

impl PoolAggregator {
    pub fn new(
        readers: HashMap<String, Arc<dyn HookReader>>,
        market: Arc<dyn MarketDataSource>,
    ) -> Self {
        Self {
            readers,
            market,
            stats: AggregatorStats::default(),
        }
    }

    pub fn stats(&self) -> &AggregatorStats {
        &self.stats
    }

    fn reader_for(&self, config: &NetworkConfig) -> Option<Arc<dyn HookReader>> {
        self.readers.get(config.key).cloned()
    }

    fn count_read(&self, failed: bool) {
        self.stats.chain_reads.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.stats.read_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Full snapshot list for a network. Never fails: with no RPC connection
    /// at all, every snapshot is built from fallbacks and a top-level error
    /// reports the degradation.
    pub async fn pool_info(&self, network: &str) -> PoolInfoResponse {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let config = networks::resolve(network);

        let Some(reader) = self.reader_for(config) else {
            tracing::warn!("pool_info for {} served entirely from fallbacks", config.key);
            return PoolInfoResponse {
                network: config.key.to_string(),
                pools: config
                    .supported_pools
                    .iter()
                    .map(|def| fallback_snapshot(config, def, "rpc unavailable"))
                    .collect(),
                error: Some(format!("no rpc connection for network {}", config.key)),
            };
        };

        let snapshots = config
            .supported_pools
            .iter()
            .map(|def| self.snapshot(config, def, reader.clone()));
        let pools = join_all(snapshots).await;

        PoolInfoResponse {
            network: config.key.to_string(),
            pools,
            error: None,
        }
    }

    async fn snapshot(
        &self,
        config: &NetworkConfig,
        definition: &PoolDefinition,
        reader: Arc<dyn HookReader>,
    ) -> PoolSnapshot {
        let key = match key_for(definition, config.hook_address) {
            Ok(key) => key,
            Err(e) => return fallback_snapshot(config, definition, &e.to_string()),
        };
        let id = pool_id(&key);

        // The three reads are independent; order between them is not
        // guaranteed and not relied upon.
        let (fee, count, volume) = tokio::join!(
            reader.current_fee(&key),
            reader.swap_count(id),
            self.market
                .token_volume_24h(config.gecko_network, definition.currency0),
        );
        self.count_read(fee.is_err());
        self.count_read(count.is_err());

        let fee = Reading::from_result(fee, definition.fee, "current fee");
        let count = Reading::from_result(count, 0, "swap count");
        let volume = Reading::from_result(volume, definition.fallback_volume_usd, "24h volume");

        let initialized = fee.is_live() && count.is_live();
        let notes: Vec<&str> = [fee.reason(), count.reason(), volume.reason()]
            .into_iter()
            .flatten()
            .collect();
        let error = if notes.is_empty() {
            None
        } else {
            Some(notes.join("; "))
        };

        PoolSnapshot {
            definition: definition.clone(),
            pool_id: id,
            current_fee: *fee.value(),
            formatted_current_fee: format_fee_percentage(*fee.value()),
            swap_count: count.into_value(),
            total_volume: volume.into_value(),
            initialized,
            error,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Static hook/network metadata plus the owner read.
    pub async fn hook_info(&self, network: &str) -> HookInfo {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let config = networks::resolve(network);

        let (owner, note) = match self.reader_for(config) {
            Some(reader) => {
                let owner = reader.owner().await;
                self.count_read(owner.is_err());
                match owner {
                    Ok(owner) => (Some(owner), None),
                    Err(e) => (None, Some(format!("owner read failed: {e}"))),
                }
            }
            None => (None, Some("rpc unavailable".to_string())),
        };

        HookInfo {
            network: config.key.to_string(),
            hook_address: config.hook_address,
            pool_manager_address: config.pool_manager_address,
            position_manager_address: config.position_manager_address,
            permit2_address: config.permit2_address,
            explorer_url: config.explorer_url.to_string(),
            owner,
            note,
            supported_pools: config.supported_pools.clone(),
        }
    }

    /// Emergency override state. A failed flag read degrades to inactive
    /// with a note rather than erroring.
    pub async fn emergency_status(&self, network: &str) -> EmergencyStatus {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let config = networks::resolve(network);

        let (active, fee) = match self.reader_for(config) {
            Some(reader) => {
                let (active, fee) =
                    tokio::join!(reader.emergency_mode_active(), reader.emergency_fee());
                self.count_read(active.is_err());
                self.count_read(fee.is_err());
                (
                    Reading::from_result(active, false, "emergency flag"),
                    Reading::from_result(fee, 0, "emergency fee"),
                )
            }
            None => (
                Reading::Fallback {
                    value: false,
                    reason: "emergency flag: rpc unavailable".to_string(),
                },
                Reading::Fallback {
                    value: 0,
                    reason: "emergency fee: rpc unavailable".to_string(),
                },
            ),
        };

        let notes: Vec<&str> = [active.reason(), fee.reason()]
            .into_iter()
            .flatten()
            .collect();
        EmergencyStatus {
            network: config.key.to_string(),
            is_active: *active.value(),
            emergency_fee: *fee.value(),
            formatted_emergency_fee: format_fee_percentage(*fee.value()),
            note: if notes.is_empty() {
                None
            } else {
                Some(notes.join("; "))
            },
        }
    }

    /// Whether `address` is the hook owner on this network.
    pub async fn owner_status(&self, network: &str, address: Address) -> OwnerStatus {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let config = networks::resolve(network);

        let (owner, note) = match self.reader_for(config) {
            Some(reader) => {
                let owner = reader.owner().await;
                self.count_read(owner.is_err());
                match owner {
                    Ok(owner) => (Some(owner), None),
                    Err(e) => (None, Some(format!("owner read failed: {e}"))),
                }
            }
            None => (None, Some("rpc unavailable".to_string())),
        };

        OwnerStatus {
            address,
            owner,
            is_owner: owner == Some(address),
            note,
        }
    }

    /// Single current-fee read for an ad-hoc pool key. Unlike the aggregate
    /// operations this surfaces the failure; it exists to inspect one read.
    pub async fn current_fee(
        &self,
        network: &str,
        currency0: Address,
        currency1: Address,
        fee: u32,
        tick_spacing: i32,
    ) -> Result<FeeQuote, ReadError> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let config = networks::resolve(network);
        let reader = self
            .reader_for(config)
            .ok_or_else(|| ReadError::NoConnection(config.key.to_string()))?;

        let key = pool_key(currency0, currency1, fee, tick_spacing, config.hook_address)?;
        let live = reader.current_fee(&key).await;
        self.count_read(live.is_err());
        let live = live?;
        Ok(FeeQuote {
            fee: live,
            formatted_fee: format_fee_percentage(live),
        })
    }

    /// Single swap-count read for an ad-hoc pool key.
    pub async fn swap_count(
        &self,
        network: &str,
        currency0: Address,
        currency1: Address,
        fee: u32,
        tick_spacing: i32,
    ) -> Result<SwapCountInfo, ReadError> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let config = networks::resolve(network);
        let reader = self
            .reader_for(config)
            .ok_or_else(|| ReadError::NoConnection(config.key.to_string()))?;

        let key = pool_key(currency0, currency1, fee, tick_spacing, config.hook_address)?;
        let id = pool_id(&key);
        let count = reader.swap_count(id).await;
        self.count_read(count.is_err());
        Ok(SwapCountInfo {
            pool_id: id,
            swap_count: count?,
        })
    }

    /// Read-only creation probe: derives the would-be pool id and checks
    /// whether the hook already serves a fee for that key.
    pub async fn estimate_pool_creation(
        &self,
        network: &str,
        currency0: Address,
        currency1: Address,
        fee: u32,
        tick_spacing: i32,
    ) -> Result<PoolCreationEstimate, ReadError> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let config = networks::resolve(network);

        let key = pool_key(currency0, currency1, fee, tick_spacing, config.hook_address)?;
        let id = pool_id(&key);

        let exists = match self.reader_for(config) {
            Some(reader) => {
                let fee = reader.current_fee(&key).await;
                self.count_read(fee.is_err());
                fee.is_ok()
            }
            None => false,
        };

        Ok(PoolCreationEstimate {
            exists,
            pool_id: id,
            pool_key: PoolKeyInfo {
                currency0,
                currency1,
                fee,
                tick_spacing,
                hooks: config.hook_address,
            },
            estimated_gas: "500000".to_string(),
            hook_address: config.hook_address,
            message: exists.then(|| "Pool already exists".to_string()),
        })
    }
}

/// Snapshot built entirely from the static definition, used when no read
/// could be attempted.
fn fallback_snapshot(
    config: &NetworkConfig,
    definition: &PoolDefinition,
    reason: &str,
) -> PoolSnapshot {
    let id = key_for(definition, config.hook_address)
        .map(|key| pool_id(&key))
        .unwrap_or_default();

    PoolSnapshot {
        definition: definition.clone(),
        pool_id: id,
        current_fee: definition.fee,
        formatted_current_fee: format_fee_percentage(definition.fee),
        swap_count: 0,
        total_volume: definition.fallback_volume_usd,
        initialized: false,
        error: Some(reason.to_string()),
        timestamp: chrono::Utc::now().timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::hook::PoolKey;
    use crate::sources::SourceError;
    use alloy_primitives::{address, B256};
    use async_trait::async_trait;

    const OWNER: Address = address!("00000000000000000000000000000000000000aa");

    /// Hook reader whose individual calls can be switched to fail.
    struct MockReader {
        fee: Result<u32, ()>,
        swaps: Result<u64, ()>,
        emergency: Result<bool, ()>,
        owner: Result<Address, ()>,
    }

    impl MockReader {
        fn healthy() -> Self {
            Self {
                fee: Ok(4200),
                swaps: Ok(17),
                emergency: Ok(false),
                owner: Ok(OWNER),
            }
        }

        fn erring(r: &Result<impl Copy, ()>, what: &str) -> Result<(), ReadError> {
            match r {
                Ok(_) => Ok(()),
                Err(()) => Err(ReadError::Contract(format!("{what} reverted"))),
            }
        }
    }

    #[async_trait]
    impl HookReader for MockReader {
        async fn current_fee(&self, _key: &PoolKey) -> Result<u32, ReadError> {
            Self::erring(&self.fee, "getCurrentFee")?;
            Ok(self.fee.unwrap())
        }
        async fn emergency_mode_active(&self) -> Result<bool, ReadError> {
            Self::erring(&self.emergency, "emergencyModeActive")?;
            Ok(self.emergency.unwrap())
        }
        async fn emergency_fee(&self) -> Result<u32, ReadError> {
            Self::erring(&self.emergency, "emergencyFee")?;
            Ok(10_000)
        }
        async fn owner(&self) -> Result<Address, ReadError> {
            Self::erring(&self.owner, "owner")?;
            Ok(self.owner.unwrap())
        }
        async fn swap_count(&self, _pool_id: B256) -> Result<u64, ReadError> {
            Self::erring(&self.swaps, "swapCount")?;
            Ok(self.swaps.unwrap())
        }
    }

    struct StaticMarket(Result<f64, ()>);

    #[async_trait]
    impl MarketDataSource for StaticMarket {
        async fn token_volume_24h(
            &self,
            _gecko_network: &str,
            _token: Address,
        ) -> Result<f64, SourceError> {
            self.0.map_err(|_| SourceError::NotFound)
        }
    }

    fn aggregator(reader: MockReader, market: StaticMarket) -> PoolAggregator {
        let mut readers: HashMap<String, Arc<dyn HookReader>> = HashMap::new();
        readers.insert("base".to_string(), Arc::new(reader));
        PoolAggregator::new(readers, Arc::new(market))
    }

    fn offline_aggregator() -> PoolAggregator {
        PoolAggregator::new(HashMap::new(), Arc::new(StaticMarket(Err(()))))
    }

    #[tokio::test]
    async fn pool_info_covers_every_configured_pool() {
        let agg = aggregator(MockReader::healthy(), StaticMarket(Ok(42_000.0)));
        let resp = agg.pool_info("base").await;

        let expected = networks::resolve("base").supported_pools.len();
        assert_eq!(resp.pools.len(), expected);
        assert!(resp.error.is_none());
        for snapshot in &resp.pools {
            assert!(snapshot.initialized);
            assert_eq!(snapshot.current_fee, 4200);
            assert_eq!(snapshot.formatted_current_fee, "0.42%");
            assert_eq!(snapshot.swap_count, 17);
            assert_eq!(snapshot.total_volume, 42_000.0);
            assert!(snapshot.error.is_none());
            assert_ne!(snapshot.pool_id, B256::ZERO);
        }
    }

    #[tokio::test]
    async fn failed_fee_read_falls_back_to_configured_fee() {
        let reader = MockReader {
            fee: Err(()),
            ..MockReader::healthy()
        };
        let agg = aggregator(reader, StaticMarket(Ok(42_000.0)));
        let resp = agg.pool_info("base").await;

        for (snapshot, definition) in resp
            .pools
            .iter()
            .zip(&networks::resolve("base").supported_pools)
        {
            assert!(!snapshot.initialized);
            assert_eq!(snapshot.current_fee, definition.fee);
            assert!(snapshot.error.as_deref().unwrap().contains("current fee"));
        }
    }

    #[tokio::test]
    async fn failed_market_data_uses_mock_volume_but_stays_initialized() {
        let agg = aggregator(MockReader::healthy(), StaticMarket(Err(())));
        let resp = agg.pool_info("base").await;

        for (snapshot, definition) in resp
            .pools
            .iter()
            .zip(&networks::resolve("base").supported_pools)
        {
            assert!(snapshot.initialized);
            assert_eq!(snapshot.total_volume, definition.fallback_volume_usd);
            assert!(snapshot.error.as_deref().unwrap().contains("24h volume"));
        }
    }

    #[tokio::test]
    async fn missing_rpc_degrades_whole_network() {
        let agg = offline_aggregator();
        let resp = agg.pool_info("base").await;

        assert!(resp.error.is_some());
        assert_eq!(
            resp.pools.len(),
            networks::resolve("base").supported_pools.len()
        );
        for (snapshot, definition) in resp
            .pools
            .iter()
            .zip(&networks::resolve("base").supported_pools)
        {
            assert!(!snapshot.initialized);
            assert_eq!(snapshot.current_fee, definition.fee);
            assert_eq!(snapshot.swap_count, 0);
            assert_eq!(snapshot.total_volume, definition.fallback_volume_usd);
        }
    }

    #[tokio::test]
    async fn unknown_network_serves_default() {
        let agg = aggregator(MockReader::healthy(), StaticMarket(Ok(1.0)));
        let resp = agg.pool_info("dogechain").await;
        assert_eq!(resp.network, networks::DEFAULT_NETWORK);
    }

    #[tokio::test]
    async fn hook_info_echoes_static_addresses() {
        let agg = aggregator(MockReader::healthy(), StaticMarket(Ok(1.0)));
        let info = agg.hook_info("base").await;

        let config = networks::resolve("base");
        assert_eq!(info.hook_address, config.hook_address);
        assert_eq!(info.pool_manager_address, config.pool_manager_address);
        assert_eq!(info.position_manager_address, config.position_manager_address);
        assert_eq!(info.permit2_address, config.permit2_address);
        assert_eq!(info.owner, Some(OWNER));
        assert!(info.note.is_none());
        assert_eq!(info.supported_pools.len(), config.supported_pools.len());
    }

    #[tokio::test]
    async fn emergency_flag_failure_reports_inactive_with_note() {
        let reader = MockReader {
            emergency: Err(()),
            ..MockReader::healthy()
        };
        let agg = aggregator(reader, StaticMarket(Ok(1.0)));
        let status = agg.emergency_status("base").await;

        assert!(!status.is_active);
        assert!(status.note.as_deref().unwrap().contains("emergency flag"));
    }

    #[tokio::test]
    async fn owner_status_compares_against_chain_owner() {
        let agg = aggregator(MockReader::healthy(), StaticMarket(Ok(1.0)));
        let status = agg.owner_status("base", OWNER).await;
        assert!(status.is_owner);

        let other = address!("00000000000000000000000000000000000000bb");
        let agg = aggregator(MockReader::healthy(), StaticMarket(Ok(1.0)));
        let status = agg.owner_status("base", other).await;
        assert!(!status.is_owner);
        assert_eq!(status.owner, Some(OWNER));
    }

    #[tokio::test]
    async fn estimate_reports_existing_pool() {
        let agg = aggregator(MockReader::healthy(), StaticMarket(Ok(1.0)));
        let config = networks::resolve("base");
        let def = &config.supported_pools[0];

        let estimate = agg
            .estimate_pool_creation("base", def.currency0, def.currency1, def.fee, def.tick_spacing)
            .await
            .unwrap();
        assert!(estimate.exists);
        assert_eq!(estimate.message.as_deref(), Some("Pool already exists"));
        assert_eq!(estimate.hook_address, config.hook_address);
    }

    #[tokio::test]
    async fn estimate_reports_missing_pool_when_fee_read_reverts() {
        let reader = MockReader {
            fee: Err(()),
            ..MockReader::healthy()
        };
        let agg = aggregator(reader, StaticMarket(Ok(1.0)));
        let config = networks::resolve("base");
        let def = &config.supported_pools[0];

        let estimate = agg
            .estimate_pool_creation("base", def.currency0, def.currency1, def.fee, def.tick_spacing)
            .await
            .unwrap();
        assert!(!estimate.exists);
        assert!(estimate.message.is_none());
        assert_eq!(estimate.estimated_gas, "500000");
    }

    #[tokio::test]
    async fn single_reads_surface_failures() {
        let reader = MockReader {
            fee: Err(()),
            ..MockReader::healthy()
        };
        let agg = aggregator(reader, StaticMarket(Ok(1.0)));
        let config = networks::resolve("base");
        let def = &config.supported_pools[0];

        let quote = agg
            .current_fee("base", def.currency0, def.currency1, def.fee, def.tick_spacing)
            .await;
        assert!(quote.is_err());

        let agg = aggregator(MockReader::healthy(), StaticMarket(Ok(1.0)));
        let quote = agg
            .current_fee("base", def.currency0, def.currency1, def.fee, def.tick_spacing)
            .await
            .unwrap();
        assert_eq!(quote.fee, 4200);
        assert_eq!(quote.formatted_fee, "0.42%");

        let count = agg
            .swap_count("base", def.currency0, def.currency1, def.fee, def.tick_spacing)
            .await
            .unwrap();
        assert_eq!(count.swap_count, 17);
        assert_ne!(count.pool_id, B256::ZERO);
    }

    #[tokio::test]
    async fn stats_count_requests_and_failures() {
        let reader = MockReader {
            fee: Err(()),
            ..MockReader::healthy()
        };
        let agg = aggregator(reader, StaticMarket(Ok(1.0)));
        let _ = agg.pool_info("base").await;

        let stats = agg.stats();
        assert_eq!(stats.total_requests.load(Ordering::Relaxed), 1);
        assert!(stats.read_failures.load(Ordering::Relaxed) >= 1);
        assert!(
            stats.chain_reads.load(Ordering::Relaxed)
                > stats.read_failures.load(Ordering::Relaxed)
        );
    }
}
