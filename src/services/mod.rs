pub mod aggregator;
pub mod token_cache;

pub use aggregator::PoolAggregator;
pub use token_cache::{TokenCache, TokenDirectory};
