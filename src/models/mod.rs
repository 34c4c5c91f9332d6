pub mod hook;
pub mod pool;

pub use hook::{
    EmergencyStatus, FeeQuote, HookInfo, OwnerStatus, PoolCreationEstimate, PoolInfoResponse,
    PoolKeyInfo, SwapCountInfo, TokenInfo,
};
pub use pool::{format_fee_percentage, PoolDefinition, PoolSnapshot, Reading};
