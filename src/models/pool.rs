use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static description of one supported trading pair. Defined once in the
/// network table, never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDefinition {
    pub name: String,
    /// Lower currency of the pool, sorted numerically (v4 pool-key ordering).
    pub currency0: Address,
    pub currency1: Address,
    /// LP fee in hundredths of a basis point (1_000_000 = 100%).
    pub fee: u32,
    pub tick_spacing: i32,
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub token0_decimals: u8,
    pub token1_decimals: u8,
    /// Figure substituted for 24h volume when no live number is available.
    #[serde(skip)]
    pub fallback_volume_usd: f64,
}

/// One pool's state as served to the dashboard. Recomputed on every request,
/// never cached; a failed upstream read degrades individual fields instead of
/// dropping the snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    #[serde(flatten)]
    pub definition: PoolDefinition,
    pub pool_id: B256,
    pub current_fee: u32,
    pub formatted_current_fee: String,
    pub swap_count: u64,
    pub total_volume: f64,
    /// True iff every chain read for this pool succeeded.
    pub initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: i64,
}

/// Outcome of a single upstream read: the live value, or a typed fallback
/// carrying the reason the live value is missing.
#[derive(Debug, Clone)]
pub enum Reading<T> {
    Live(T),
    Fallback { value: T, reason: String },
}

impl<T> Reading<T> {
    pub fn from_result<E: fmt::Display>(result: Result<T, E>, fallback: T, what: &str) -> Self {
        match result {
            Ok(value) => Reading::Live(value),
            Err(e) => Reading::Fallback {
                value: fallback,
                reason: format!("{what}: {e}"),
            },
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Reading::Live(value) => value,
            Reading::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Reading::Live(value) => value,
            Reading::Fallback { value, .. } => value,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Reading::Live(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Reading::Live(_) => None,
            Reading::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Formats an LP fee as a percentage. The fee integer is in the v4 unit,
/// hundredths of a basis point: 3000 -> "0.30%", 500 -> "0.05%".
pub fn format_fee_percentage(fee: u32) -> String {
    format!("{:.2}%", f64::from(fee) / 10_000.0)
}
