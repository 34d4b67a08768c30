use serde::{Deserialize, Serialize};
use super::PoolRecord;
use crate::services::scoring;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolCategory {
    Defi,
    Memecoin,
    Gamefi,
    Nft,
    Stable,
}

impl PoolCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "defi" => Some(PoolCategory::Defi),
            "memecoin" => Some(PoolCategory::Memecoin),
            "gamefi" => Some(PoolCategory::Gamefi),
            "nft" => Some(PoolCategory::Nft),
            "stable" => Some(PoolCategory::Stable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Badge color the dashboard renders for this level.
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "yellow",
            RiskLevel::High => "red",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// Analytics derived from a single pool record. Recomputed on demand,
/// never stored next to the record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub name: String,
    pub apr: f64,
    pub tvl: f64,
    pub volume_24h: f64,
    pub fee_rate_percent: f64,
    pub category: PoolCategory,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_color: &'static str,
    pub apr_change_percent: f64,
    pub volume_efficiency: f64,
}

impl DerivedMetrics {
    pub fn from_record(pool: &PoolRecord) -> Self {
        let risk_score = scoring::risk_score(pool);
        let risk_level = scoring::risk_level(risk_score);
        Self {
            name: pool.name(),
            apr: pool.day.apr,
            tvl: pool.tvl,
            volume_24h: pool.day.volume,
            fee_rate_percent: scoring::fee_rate_percent(pool),
            category: scoring::classify(pool),
            risk_score,
            risk_level,
            risk_color: risk_level.color(),
            apr_change_percent: scoring::apr_change(pool),
            volume_efficiency: scoring::volume_efficiency(pool),
        }
    }
}
