use alloy_primitives::{address, Address};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::TokenInfo;
use crate::networks;
use crate::sources::TokenReader;

/// Append-only token-metadata cache. Entries are added opportunistically as
/// lookups resolve and never evicted; losing the map on restart is fine.
pub struct TokenCache {
    tokens: RwLock<HashMap<Address, TokenInfo>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Cache pre-seeded with tokens every dashboard session touches, so the
    /// common path never hits the RPC.
    pub fn with_common_tokens() -> Self {
        let cache = Self::new();
        let seed = [
            (
                address!("4200000000000000000000000000000000000006"),
                "Wrapped Ether",
                "WETH",
                18u8,
            ),
            (
                address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
                "USD Coin",
                "USDC",
                6,
            ),
            (
                address!("27d2decb4bfc9c76f0309b8e88dec3a601fe25a8"),
                "Based Bald",
                "BALD",
                18,
            ),
            (
                address!("f34d508f72a9c59594d02df2742f8abc67bec0a7"),
                "Degen",
                "DEGEN",
                18,
            ),
            (
                address!("4ed4e862860bed51a9570b96d89af5e1b0efefed"),
                "Degen",
                "DEGEN",
                18,
            ),
        ];
        for (addr, name, symbol, decimals) in seed {
            cache.insert(TokenInfo {
                address: addr,
                name: name.to_string(),
                symbol: symbol.to_string(),
                decimals,
                chain: networks::DEFAULT_NETWORK.to_string(),
            });
        }
        cache
    }

    pub fn get(&self, address: &Address) -> Option<TokenInfo> {
        self.tokens.read().get(address).cloned()
    }

    pub fn insert(&self, info: TokenInfo) {
        self.tokens.write().insert(info.address, info);
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Token lookups for /api/token-info: cache first, then the network's ERC-20
/// reader, caching whatever resolved.
pub struct TokenDirectory {
    readers: HashMap<String, Arc<dyn TokenReader>>,
    cache: TokenCache,
}

impl TokenDirectory {
    pub fn new(readers: HashMap<String, Arc<dyn TokenReader>>, cache: TokenCache) -> Self {
        Self { readers, cache }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub async fn lookup(&self, network: &str, address: Address) -> TokenInfo {
        let config = networks::resolve(network);

        if let Some(mut hit) = self.cache.get(&address) {
            hit.chain = config.key.to_string();
            return hit;
        }

        let info = match self.readers.get(config.key) {
            Some(reader) => {
                let meta = reader.token_metadata(address).await;
                let info = TokenInfo {
                    address,
                    name: meta.name,
                    symbol: meta.symbol,
                    decimals: meta.decimals,
                    chain: config.key.to_string(),
                };
                if meta.resolved {
                    self.cache.insert(info.clone());
                }
                info
            }
            None => TokenInfo {
                address,
                name: "Unknown Token".to_string(),
                symbol: "UNKNOWN".to_string(),
                decimals: 18,
                chain: config.key.to_string(),
            },
        };

        info
    }
}
