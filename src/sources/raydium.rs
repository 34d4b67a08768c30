use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use crate::config::UpstreamConfig;
use crate::models::{PeriodStats, PoolPage, PoolRecord, TokenInfo};
use super::{PoolSource, SourceError};

/// Category filter passed through to the upstream listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolType {
    All,
    Concentrated,
    Standard,
    AllFarm,
    ConcentratedFarm,
    StandardFarm,
}

impl PoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolType::All => "all",
            PoolType::Concentrated => "concentrated",
            PoolType::Standard => "standard",
            PoolType::AllFarm => "allFarm",
            PoolType::ConcentratedFarm => "concentratedFarm",
            PoolType::StandardFarm => "standardFarm",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(PoolType::All),
            "concentrated" => Some(PoolType::Concentrated),
            "standard" => Some(PoolType::Standard),
            "allFarm" => Some(PoolType::AllFarm),
            "concentratedFarm" => Some(PoolType::ConcentratedFarm),
            "standardFarm" => Some(PoolType::StandardFarm),
            _ => None,
        }
    }
}

/// Server-side sort fields the upstream accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSortField {
    Default,
    Liquidity,
    Volume24h,
    Fee24h,
    Apr24h,
    Volume7d,
    Fee7d,
    Apr7d,
    Volume30d,
    Fee30d,
    Apr30d,
}

impl PoolSortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolSortField::Default => "default",
            PoolSortField::Liquidity => "liquidity",
            PoolSortField::Volume24h => "volume24h",
            PoolSortField::Fee24h => "fee24h",
            PoolSortField::Apr24h => "apr24h",
            PoolSortField::Volume7d => "volume7d",
            PoolSortField::Fee7d => "fee7d",
            PoolSortField::Apr7d => "apr7d",
            PoolSortField::Volume30d => "volume30d",
            PoolSortField::Fee30d => "fee30d",
            PoolSortField::Apr30d => "apr30d",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(PoolSortField::Default),
            "liquidity" => Some(PoolSortField::Liquidity),
            "volume24h" => Some(PoolSortField::Volume24h),
            "fee24h" => Some(PoolSortField::Fee24h),
            "apr24h" => Some(PoolSortField::Apr24h),
            "volume7d" => Some(PoolSortField::Volume7d),
            "fee7d" => Some(PoolSortField::Fee7d),
            "apr7d" => Some(PoolSortField::Apr7d),
            "volume30d" => Some(PoolSortField::Volume30d),
            "fee30d" => Some(PoolSortField::Fee30d),
            "apr30d" => Some(PoolSortField::Apr30d),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchParams {
    pub pool_type: PoolType,
    pub sort_field: PoolSortField,
    pub sort_direction: SortDirection,
    pub page_size: u32,
    /// 1-based.
    pub page: u32,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            pool_type: PoolType::All,
            sort_field: PoolSortField::Default,
            sort_direction: SortDirection::Desc,
            page_size: 100,
            page: 1,
        }
    }
}

/// Client for the pool-listing API. One GET per page, no retries;
/// the collector's refresh cycle is the retry policy.
pub struct RaydiumClient {
    client: Client,
    base_url: String,
    defaults: FetchParams,
}

impl RaydiumClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let defaults = FetchParams {
            pool_type: PoolType::parse(&config.pool_type).unwrap_or(PoolType::All),
            sort_field: PoolSortField::parse(&config.sort_field).unwrap_or(PoolSortField::Default),
            sort_direction: SortDirection::parse(&config.sort_direction)
                .unwrap_or(SortDirection::Desc),
            page_size: config.page_size.max(1),
            page: 1,
        };

        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            defaults,
        }
    }

    pub async fn fetch_pools(&self, params: &FetchParams) -> Result<PoolPage, SourceError> {
        let url = format!(
            "{}/pools/info/list?poolType={}&poolSortField={}&sortType={}&pageSize={}&page={}",
            self.base_url,
            params.pool_type.as_str(),
            params.sort_field.as_str(),
            params.sort_direction.as_str(),
            params.page_size.max(1),
            params.page.max(1),
        );

        let resp = self.client.get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if resp.status() == 429 {
            return Err(SourceError::RateLimit);
        }

        if !resp.status().is_success() {
            return Err(SourceError::Upstream(resp.status().as_u16()));
        }

        let body: ApiResponse = resp.json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        if !body.success {
            return Err(SourceError::Upstream(0));
        }

        Ok(PoolPage {
            records: body.data.data.into_iter().map(WirePool::into_record).collect(),
            count: body.data.count,
            has_next_page: body.data.has_next_page,
        })
    }
}

#[async_trait]
impl PoolSource for RaydiumClient {
    fn name(&self) -> &'static str {
        "raydium"
    }

    async fn fetch_page(&self, page: u32) -> Result<PoolPage, SourceError> {
        self.fetch_pools(&FetchParams { page, ..self.defaults }).await
    }
}

// Wire shapes. Every field defaults so a sparse record converts instead
// of failing the whole page.

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: ApiPage,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPage {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    data: Vec<WirePool>,
    #[serde(default, rename = "hasNextPage")]
    has_next_page: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WirePool {
    id: String,
    mint_a: WireToken,
    mint_b: WireToken,
    price: f64,
    mint_amount_a: f64,
    mint_amount_b: f64,
    fee_rate: f64,
    open_time: OpenTime,
    tvl: f64,
    day: WirePeriod,
    week: WirePeriod,
    month: WirePeriod,
    #[serde(rename = "pooltype")]
    pool_types: Vec<String>,
    farm_upcoming_count: u32,
    farm_ongoing_count: u32,
    farm_finished_count: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireToken {
    address: String,
    symbol: String,
    decimals: u8,
    #[serde(rename = "logoURI")]
    logo_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WirePeriod {
    volume: f64,
    volume_quote: f64,
    volume_fee: f64,
    apr: f64,
    fee_apr: f64,
    price_min: f64,
    price_max: f64,
}

/// The upstream sends openTime as either an ISO string or a numeric epoch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpenTime {
    Text(String),
    Epoch(f64),
}

impl Default for OpenTime {
    fn default() -> Self {
        OpenTime::Text(String::new())
    }
}

impl OpenTime {
    fn into_string(self) -> String {
        match self {
            OpenTime::Text(s) => s,
            OpenTime::Epoch(n) if n.fract() == 0.0 => format!("{}", n as i64),
            OpenTime::Epoch(n) => format!("{}", n),
        }
    }
}

impl WireToken {
    fn into_token(self) -> TokenInfo {
        TokenInfo {
            address: self.address,
            symbol: self.symbol,
            decimals: self.decimals,
            logo_uri: self.logo_uri,
        }
    }
}

impl WirePeriod {
    fn into_stats(self) -> PeriodStats {
        PeriodStats {
            volume: self.volume,
            volume_quote: self.volume_quote,
            volume_fee: self.volume_fee,
            apr: self.apr,
            fee_apr: self.fee_apr,
            price_min: self.price_min,
            price_max: self.price_max,
        }
    }
}

impl WirePool {
    fn into_record(self) -> PoolRecord {
        PoolRecord {
            id: self.id,
            token_a: self.mint_a.into_token(),
            token_b: self.mint_b.into_token(),
            price: self.price,
            amount_a: self.mint_amount_a,
            amount_b: self.mint_amount_b,
            fee_rate: self.fee_rate,
            open_time: self.open_time.into_string(),
            tvl: self.tvl,
            day: self.day.into_stats(),
            week: self.week.into_stats(),
            month: self.month.into_stats(),
            pool_types: self.pool_types,
            farm_upcoming_count: self.farm_upcoming_count,
            farm_ongoing_count: self.farm_ongoing_count,
            farm_finished_count: self.farm_finished_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_wire_pool_converts_with_defaults() {
        let raw = r#"{
            "success": true,
            "data": {
                "count": 1,
                "data": [{"id": "p1", "mintA": {"symbol": "SOL"}, "day": {"apr": 12.5}}],
                "hasNextPage": false
            }
        }"#;

        let body: ApiResponse = serde_json::from_str(raw).unwrap();
        let pool = body.data.data.into_iter().next().unwrap().into_record();

        assert_eq!(pool.id, "p1");
        assert_eq!(pool.token_a.symbol, "SOL");
        assert_eq!(pool.token_b.symbol, "");
        assert_eq!(pool.tvl, 0.0);
        assert_eq!(pool.day.apr, 12.5);
        assert_eq!(pool.week.apr, 0.0);
        assert!(pool.pool_types.is_empty());
    }

    #[test]
    fn open_time_accepts_string_and_epoch() {
        let as_text: OpenTime = serde_json::from_str(r#""2024-01-01T00:00:00Z""#).unwrap();
        assert_eq!(as_text.into_string(), "2024-01-01T00:00:00Z");

        let as_epoch: OpenTime = serde_json::from_str("1700000000").unwrap();
        assert_eq!(as_epoch.into_string(), "1700000000");
    }

    #[test]
    fn fetch_params_map_to_query_vocabulary() {
        assert_eq!(PoolType::parse("allFarm"), Some(PoolType::AllFarm));
        assert_eq!(PoolType::parse("bogus"), None);
        assert_eq!(PoolSortField::parse("apr7d").unwrap().as_str(), "apr7d");
        assert_eq!(SortDirection::parse("asc").unwrap().as_str(), "asc");

        let params = FetchParams::default();
        assert_eq!(params.pool_type.as_str(), "all");
        assert_eq!(params.sort_direction.as_str(), "desc");
        assert_eq!(params.page, 1);
    }
}
