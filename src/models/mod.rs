pub mod pool;
pub mod metrics;

pub use pool::{PoolPage, PoolRecord, PeriodStats, TokenInfo};
pub use metrics::{DerivedMetrics, PoolCategory, RiskLevel};
