use std::collections::HashMap;
use std::sync::Arc;
use serde::Serialize;
use crate::models::{PoolCategory, PoolRecord};
use super::scoring;

const TOP_POOL_COUNT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: PoolCategory,
    pub tvl: f64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPool {
    pub id: String,
    pub name: String,
    pub apr: f64,
    pub tvl: f64,
}

/// Aggregate stats for the dashboard overview panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub pool_count: usize,
    pub total_tvl: f64,
    pub total_volume_24h: f64,
    pub total_fees_24h: f64,
    pub average_apr: f64,
    pub categories: Vec<CategoryShare>,
    pub top_pools: Vec<TopPool>,
}

pub fn overview(pools: &[Arc<PoolRecord>]) -> Overview {
    let pool_count = pools.len();
    let total_tvl: f64 = pools.iter().map(|p| p.tvl).sum();
    let total_volume_24h: f64 = pools.iter().map(|p| p.day.volume).sum();
    let total_fees_24h: f64 = pools.iter().map(|p| p.day.volume_fee).sum();
    let average_apr = if pool_count > 0 {
        pools.iter().map(|p| p.day.apr).sum::<f64>() / pool_count as f64
    } else {
        0.0
    };

    let mut by_category: HashMap<PoolCategory, f64> = HashMap::new();
    for pool in pools {
        *by_category.entry(scoring::classify(pool)).or_default() += pool.tvl;
    }
    let mut categories: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, tvl)| CategoryShare {
            category,
            tvl,
            share_percent: if total_tvl > 0.0 { tvl / total_tvl * 100.0 } else { 0.0 },
        })
        .collect();
    categories.sort_by(|a, b| b.tvl.partial_cmp(&a.tvl).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranked: Vec<&Arc<PoolRecord>> = pools.iter().collect();
    ranked.sort_by(|a, b| {
        b.day.apr.partial_cmp(&a.day.apr).unwrap_or(std::cmp::Ordering::Equal)
    });
    let top_pools = ranked
        .into_iter()
        .take(TOP_POOL_COUNT)
        .map(|p| TopPool {
            id: p.id.clone(),
            name: p.name(),
            apr: p.day.apr,
            tvl: p.tvl,
        })
        .collect();

    Overview {
        pool_count,
        total_tvl,
        total_volume_24h,
        total_fees_24h,
        average_apr,
        categories,
        top_pools,
    }
}
