use serde::{Deserialize, Serialize};

/// One side of a pool's token pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

/// Rolling-window stats the upstream reports per pool (APRs are percents).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodStats {
    pub volume: f64,
    pub volume_quote: f64,
    pub volume_fee: f64,
    pub apr: f64,
    pub fee_apr: f64,
    pub price_min: f64,
    pub price_max: f64,
}

/// A pool listing as held in the snapshot store. Built at the source
/// boundary from the upstream wire shape; missing numerics default to 0,
/// missing strings to empty. Immutable once fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolRecord {
    pub id: String,
    pub token_a: TokenInfo,
    pub token_b: TokenInfo,
    pub price: f64,
    pub amount_a: f64,
    pub amount_b: f64,
    /// Trading fee as a fraction, e.g. 0.0025.
    pub fee_rate: f64,
    /// Upstream sends either an ISO string or a numeric epoch; normalized
    /// to its string form at the boundary.
    pub open_time: String,
    pub tvl: f64,
    pub day: PeriodStats,
    pub week: PeriodStats,
    pub month: PeriodStats,
    pub pool_types: Vec<String>,
    pub farm_upcoming_count: u32,
    pub farm_ongoing_count: u32,
    pub farm_finished_count: u32,
}

impl PoolRecord {
    /// Display name, e.g. "SOL/USDC".
    pub fn name(&self) -> String {
        format!("{}/{}", self.token_a.symbol, self.token_b.symbol)
    }
}

/// One page of upstream results plus pagination metadata.
#[derive(Debug, Clone)]
pub struct PoolPage {
    pub records: Vec<PoolRecord>,
    pub count: u64,
    pub has_next_page: bool,
}
