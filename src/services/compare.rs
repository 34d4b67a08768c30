use std::sync::Arc;
use serde::Serialize;
use crate::models::PoolRecord;
use super::scoring;

/// The dashboard compares at most this many pools side by side.
pub const MAX_COMPARE: usize = 3;

/// Two values within this distance count as a shared best.
const TIE_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareMetric {
    Apr,
    Tvl,
    Volume24h,
    FeeRate,
    VolumeEfficiency,
    AprChange,
    RiskScore,
}

impl CompareMetric {
    pub const ALL: [CompareMetric; 7] = [
        CompareMetric::Apr,
        CompareMetric::Tvl,
        CompareMetric::Volume24h,
        CompareMetric::FeeRate,
        CompareMetric::VolumeEfficiency,
        CompareMetric::AprChange,
        CompareMetric::RiskScore,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CompareMetric::Apr => "APR",
            CompareMetric::Tvl => "TVL",
            CompareMetric::Volume24h => "24h Volume",
            CompareMetric::FeeRate => "Trading Fee",
            CompareMetric::VolumeEfficiency => "Volume/TVL",
            CompareMetric::AprChange => "APR Change",
            CompareMetric::RiskScore => "Risk Score",
        }
    }

    /// Fee rate and risk score are costs; everything else is a yield.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, CompareMetric::FeeRate | CompareMetric::RiskScore)
    }

    pub fn value(&self, pool: &PoolRecord) -> f64 {
        match self {
            CompareMetric::Apr => pool.day.apr,
            CompareMetric::Tvl => pool.tvl,
            CompareMetric::Volume24h => pool.day.volume,
            CompareMetric::FeeRate => scoring::fee_rate_percent(pool),
            CompareMetric::VolumeEfficiency => scoring::volume_efficiency(pool),
            CompareMetric::AprChange => scoring::apr_change(pool),
            CompareMetric::RiskScore => scoring::risk_score(pool),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub metric: CompareMetric,
    pub label: &'static str,
    pub higher_is_better: bool,
    pub values: Vec<f64>,
    /// best[i] is true when pool i attains the best value, within tolerance.
    pub best: Vec<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub pool_ids: Vec<String>,
    pub pool_names: Vec<String>,
    pub rows: Vec<ComparisonRow>,
    /// How many metrics each pool wins (shared bests count for both).
    pub best_counts: Vec<usize>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CompareError {
    Empty,
    TooMany(usize),
}

impl std::fmt::Display for CompareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareError::Empty => write!(f, "no pools selected"),
            CompareError::TooMany(n) => {
                write!(f, "{} pools selected, maximum is {}", n, MAX_COMPARE)
            }
        }
    }
}

pub fn compare(pools: &[Arc<PoolRecord>]) -> Result<Comparison, CompareError> {
    if pools.is_empty() {
        return Err(CompareError::Empty);
    }
    if pools.len() > MAX_COMPARE {
        return Err(CompareError::TooMany(pools.len()));
    }

    let mut rows = Vec::with_capacity(CompareMetric::ALL.len());
    let mut best_counts = vec![0usize; pools.len()];

    for metric in CompareMetric::ALL {
        let values: Vec<f64> = pools.iter().map(|p| metric.value(p)).collect();
        let best_value = if metric.higher_is_better() {
            values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.iter().cloned().fold(f64::INFINITY, f64::min)
        };
        let best: Vec<bool> = values
            .iter()
            .map(|v| (v - best_value).abs() < TIE_EPSILON)
            .collect();

        for (i, flag) in best.iter().enumerate() {
            if *flag {
                best_counts[i] += 1;
            }
        }

        rows.push(ComparisonRow {
            metric,
            label: metric.label(),
            higher_is_better: metric.higher_is_better(),
            values,
            best,
        });
    }

    Ok(Comparison {
        pool_ids: pools.iter().map(|p| p.id.clone()).collect(),
        pool_names: pools.iter().map(|p| p.name()).collect(),
        rows,
        best_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodStats, TokenInfo};

    fn pool(id: &str, tvl: f64, apr: f64, volume: f64, fee_rate: f64) -> Arc<PoolRecord> {
        Arc::new(PoolRecord {
            id: id.to_string(),
            token_a: TokenInfo { symbol: "RAY".to_string(), ..Default::default() },
            token_b: TokenInfo { symbol: "SOL".to_string(), ..Default::default() },
            tvl,
            fee_rate,
            day: PeriodStats { apr, volume, ..Default::default() },
            ..Default::default()
        })
    }

    #[test]
    fn best_flags_follow_metric_direction() {
        let a = pool("a", 1_000_000.0, 20.0, 100_000.0, 0.0025);
        let b = pool("b", 2_000_000.0, 10.0, 300_000.0, 0.01);
        let cmp = compare(&[a, b]).unwrap();

        let apr_row = cmp.rows.iter().find(|r| r.metric == CompareMetric::Apr).unwrap();
        assert_eq!(apr_row.best, vec![true, false]);

        let tvl_row = cmp.rows.iter().find(|r| r.metric == CompareMetric::Tvl).unwrap();
        assert_eq!(tvl_row.best, vec![false, true]);

        // Lower fee wins
        let fee_row = cmp.rows.iter().find(|r| r.metric == CompareMetric::FeeRate).unwrap();
        assert_eq!(fee_row.best, vec![true, false]);
    }

    #[test]
    fn near_equal_values_share_the_best_flag() {
        let a = pool("a", 1_000_000.0, 20.0, 100_000.0, 0.0025);
        let b = pool("b", 1_000_000.005, 20.005, 100_000.0, 0.0025);
        let cmp = compare(&[a, b]).unwrap();

        let apr_row = cmp.rows.iter().find(|r| r.metric == CompareMetric::Apr).unwrap();
        assert_eq!(apr_row.best, vec![true, true]);
    }

    #[test]
    fn best_counts_sum_wins() {
        let strong = pool("a", 10_000_000.0, 50.0, 5_000_000.0, 0.0001);
        let weak = pool("b", 1_000.0, 5.0, 10.0, 0.03);
        let cmp = compare(&[strong.clone(), weak]).unwrap();
        // The strong pool should win every metric except possibly APR change
        assert!(cmp.best_counts[0] >= 6);
        assert_eq!(cmp.rows.len(), CompareMetric::ALL.len());
    }

    #[test]
    fn selection_size_is_bounded() {
        assert_eq!(compare(&[]).unwrap_err(), CompareError::Empty);

        let pools: Vec<_> = (0..4)
            .map(|i| pool(&format!("p{}", i), 1.0, 1.0, 1.0, 0.0))
            .collect();
        assert_eq!(compare(&pools).unwrap_err(), CompareError::TooMany(4));
    }
}
