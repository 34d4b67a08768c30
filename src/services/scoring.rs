use crate::models::{PoolCategory, PoolRecord, RiskLevel};
use serde::Serialize;

/// Pools below this day APR (percent) are never shown.
pub const MIN_DISPLAY_APR: f64 = 4.0;

const MEMECOIN_KEYWORDS: &[&str] = &["bonk", "wif", "samo", "cope", "popcat", "myro", "wen"];
const STABLE_KEYWORDS: &[&str] = &["usdc", "usdt", "dai", "usd"];
const GAMEFI_KEYWORDS: &[&str] = &["gmt", "stepn", "atlas", "polis", "aurory"];

/// Keyword match on the combined pair name, checked in priority order:
/// memecoin, then stable, then gamefi. Nothing maps to Nft; that variant
/// only carries external tags and its risk weight.
pub fn classify(pool: &PoolRecord) -> PoolCategory {
    let symbol = pool.name().to_lowercase();

    if MEMECOIN_KEYWORDS.iter().any(|kw| symbol.contains(kw)) {
        return PoolCategory::Memecoin;
    }
    if STABLE_KEYWORDS.iter().any(|kw| symbol.contains(kw)) {
        return PoolCategory::Stable;
    }
    if GAMEFI_KEYWORDS.iter().any(|kw| symbol.contains(kw)) {
        return PoolCategory::Gamefi;
    }

    PoolCategory::Defi
}

pub fn fee_rate_percent(pool: &PoolRecord) -> f64 {
    pool.fee_rate * 100.0
}

/// 0-100, higher = riskier. Three independently capped components:
/// TVL depth (40), volume/TVL turnover (30), pair category (30).
pub fn risk_score(pool: &PoolRecord) -> f64 {
    let mut score = 0.0;

    score += tvl_component(pool.tvl);

    let ratio = if pool.tvl > 0.0 { pool.day.volume / pool.tvl } else { 0.0 };
    if ratio > 10.0 {
        score += 30.0;
    } else if ratio > 5.0 {
        score += 20.0;
    } else if ratio > 2.0 {
        score += 10.0;
    } else if ratio > 0.5 {
        score += 5.0;
    }

    score += match classify(pool) {
        PoolCategory::Memecoin => 30.0,
        PoolCategory::Nft => 25.0,
        PoolCategory::Gamefi => 20.0,
        PoolCategory::Defi => 10.0,
        PoolCategory::Stable => 0.0,
    };

    score.clamp(0.0, 100.0)
}

fn tvl_component(tvl: f64) -> f64 {
    if tvl < 10_000.0 {
        40.0
    } else if tvl < 100_000.0 {
        30.0
    } else if tvl < 1_000_000.0 {
        20.0
    } else if tvl < 10_000_000.0 {
        10.0
    } else {
        0.0
    }
}

/// Fixed thresholds, lower bound inclusive, upper bound exclusive.
pub fn risk_level(score: f64) -> RiskLevel {
    if score < 30.0 {
        RiskLevel::Low
    } else if score < 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Relative change of day APR vs week APR, rounded to 2 decimals.
/// Defined as 0 when the week APR is 0.
pub fn apr_change(pool: &PoolRecord) -> f64 {
    let day_apr = pool.day.apr;
    let week_apr = pool.week.apr;

    if week_apr == 0.0 {
        return 0.0;
    }

    let change = (day_apr - week_apr) / week_apr * 100.0;
    (change * 100.0).round() / 100.0
}

/// 24h volume per dollar of TVL. Defined as 0 when TVL is 0.
pub fn volume_efficiency(pool: &PoolRecord) -> f64 {
    if pool.tvl > 0.0 {
        pool.day.volume / pool.tvl
    } else {
        0.0
    }
}

/// Projected earnings for `amount` quote units deposited at the pool's
/// current day APR, valued at `price_usd` per unit.
#[derive(Debug, Clone, Serialize)]
pub struct YieldProjection {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
}

pub fn project_yield(apr_percent: f64, amount: f64, price_usd: f64) -> YieldProjection {
    let yearly = apr_percent / 100.0 * amount * price_usd;
    YieldProjection {
        daily: yearly / 365.0,
        weekly: yearly / 52.0,
        monthly: yearly / 12.0,
        yearly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodStats, TokenInfo};

    fn pool(symbol_a: &str, symbol_b: &str, tvl: f64, volume_24h: f64) -> PoolRecord {
        PoolRecord {
            id: "test".to_string(),
            token_a: TokenInfo { symbol: symbol_a.to_string(), ..Default::default() },
            token_b: TokenInfo { symbol: symbol_b.to_string(), ..Default::default() },
            tvl,
            day: PeriodStats { volume: volume_24h, ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn classification_priority_order() {
        // Memecoin wins even against a stable pairing
        assert_eq!(classify(&pool("BONK", "USDC", 0.0, 0.0)), PoolCategory::Memecoin);
        assert_eq!(classify(&pool("SOL", "USDC", 0.0, 0.0)), PoolCategory::Stable);
        assert_eq!(classify(&pool("ATLAS", "SOL", 0.0, 0.0)), PoolCategory::Gamefi);
        assert_eq!(classify(&pool("RAY", "SOL", 0.0, 0.0)), PoolCategory::Defi);
        // Case-insensitive substring match
        assert_eq!(classify(&pool("wIf", "sol", 0.0, 0.0)), PoolCategory::Memecoin);
    }

    #[test]
    fn mid_tier_defi_pool_scores_low() {
        // tvl 5M -> 10, ratio 0.4 -> 0, defi -> 10
        let p = pool("RAY", "SOL", 5_000_000.0, 2_000_000.0);
        assert_eq!(risk_score(&p), 20.0);
        assert_eq!(risk_level(risk_score(&p)), RiskLevel::Low);
    }

    #[test]
    fn small_memecoin_pool_clamps_to_high() {
        // tvl 50K -> 30, ratio 12 -> 30, memecoin -> 30; 90 stays within cap
        let p = pool("BONK", "SOL", 50_000.0, 600_000.0);
        assert_eq!(risk_score(&p), 90.0);
        assert_eq!(risk_level(90.0), RiskLevel::High);
    }

    #[test]
    fn zero_tvl_pool_takes_full_tvl_component() {
        let p = pool("RAY", "SOL", 0.0, 1_000_000.0);
        // ratio defined as 0 when tvl is 0, so only 40 (tvl) + 10 (defi)
        assert_eq!(risk_score(&p), 50.0);
        assert_eq!(volume_efficiency(&p), 0.0);
    }

    #[test]
    fn score_stays_in_bounds() {
        let worst = pool("BONK", "WIF", 1.0, 1_000_000.0);
        assert!(risk_score(&worst) <= 100.0);
        let best = pool("USDC", "USDT", 50_000_000.0, 100.0);
        assert_eq!(risk_score(&best), 0.0);
    }

    #[test]
    fn risk_thresholds_are_lower_inclusive() {
        assert_eq!(risk_level(0.0), RiskLevel::Low);
        assert_eq!(risk_level(29.99), RiskLevel::Low);
        assert_eq!(risk_level(30.0), RiskLevel::Medium);
        assert_eq!(risk_level(59.99), RiskLevel::Medium);
        assert_eq!(risk_level(60.0), RiskLevel::High);
        assert_eq!(RiskLevel::Low.color(), "green");
        assert_eq!(RiskLevel::Medium.color(), "yellow");
        assert_eq!(RiskLevel::High.color(), "red");
    }

    #[test]
    fn apr_change_relative_to_week() {
        let mut p = pool("RAY", "SOL", 0.0, 0.0);
        p.day.apr = 10.0;
        p.week.apr = 8.0;
        assert_eq!(apr_change(&p), 25.0);

        p.day.apr = 8.0;
        p.week.apr = 10.0;
        assert_eq!(apr_change(&p), -20.0);
    }

    #[test]
    fn apr_change_zero_week_is_zero() {
        let mut p = pool("RAY", "SOL", 0.0, 0.0);
        p.day.apr = 15.0;
        p.week.apr = 0.0;
        assert_eq!(apr_change(&p), 0.0);
    }

    #[test]
    fn apr_change_rounds_to_two_decimals() {
        let mut p = pool("RAY", "SOL", 0.0, 0.0);
        p.day.apr = 10.0;
        p.week.apr = 3.0;
        // (10-3)/3*100 = 233.333...
        assert_eq!(apr_change(&p), 233.33);
    }

    #[test]
    fn yield_projection_scales_from_yearly() {
        let y = project_yield(10.0, 1.5, 100.0);
        assert!((y.yearly - 15.0).abs() < 1e-9);
        assert!((y.monthly - 15.0 / 12.0).abs() < 1e-9);
        assert!((y.weekly - 15.0 / 52.0).abs() < 1e-9);
        assert!((y.daily - 15.0 / 365.0).abs() < 1e-9);
    }

    #[test]
    fn fee_rate_is_percent() {
        let mut p = pool("RAY", "SOL", 0.0, 0.0);
        p.fee_rate = 0.0025;
        assert!((fee_rate_percent(&p) - 0.25).abs() < 1e-12);
    }
}
