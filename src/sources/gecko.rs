use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{MarketDataSource, SourceError};

pub struct GeckoTerminal {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GeckoResponse {
    data: Vec<GeckoPool>,
}

#[derive(Debug, Deserialize)]
struct GeckoPool {
    attributes: GeckoPoolAttributes,
}

#[derive(Debug, Deserialize)]
struct GeckoPoolAttributes {
    volume_usd: Option<GeckoVolume>,
}

#[derive(Debug, Deserialize)]
struct GeckoVolume {
    h24: Option<String>,
}

impl GeckoTerminal {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(5))
                .build()
                .unwrap(),
        }
    }
}

#[async_trait]
impl MarketDataSource for GeckoTerminal {
    async fn token_volume_24h(
        &self,
        gecko_network: &str,
        token: Address,
    ) -> Result<f64, SourceError> {
        // Pools come back ordered by liquidity; the top pool's figure is the
        // headline number.
        let url = format!(
            "https://api.geckoterminal.com/api/v2/networks/{}/tokens/{:#x}/pools?page=1",
            gecko_network, token
        );

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if resp.status() == 429 {
            return Err(SourceError::RateLimit);
        }

        if !resp.status().is_success() {
            return Err(SourceError::NotFound);
        }

        let data: GeckoResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        data.data
            .first()
            .and_then(|p| p.attributes.volume_usd.as_ref())
            .and_then(|v| v.h24.as_ref())
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or(SourceError::NotFound)
    }
}
