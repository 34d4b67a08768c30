use std::cmp::Ordering;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::models::{PoolCategory, PoolRecord, RiskLevel};
use super::scoring;

/// Fixed page size of the dashboard list view.
pub const PAGE_SIZE: usize = 50;

/// User criteria. Every populated predicate must hold (logical AND);
/// `None` means "all".
#[derive(Debug, Clone, Default)]
pub struct PoolQuery {
    pub category: Option<PoolCategory>,
    pub search: Option<String>,
    pub min_tvl: Option<f64>,
    pub max_tvl: Option<f64>,
    pub min_apr: Option<f64>,
    pub max_apr: Option<f64>,
    pub risk: Option<RiskLevel>,
}

impl PoolQuery {
    pub fn matches(&self, pool: &PoolRecord) -> bool {
        if let Some(category) = self.category {
            if scoring::classify(pool) != category {
                return false;
            }
        }

        if let Some(term) = &self.search {
            if !term.is_empty()
                && !pool.name().to_lowercase().contains(&term.to_lowercase())
            {
                return false;
            }
        }

        // Range bounds are inclusive on both ends
        if let Some(min) = self.min_tvl {
            if pool.tvl < min {
                return false;
            }
        }
        if let Some(max) = self.max_tvl {
            if pool.tvl > max {
                return false;
            }
        }
        if let Some(min) = self.min_apr {
            if pool.day.apr < min {
                return false;
            }
        }
        if let Some(max) = self.max_apr {
            if pool.day.apr > max {
                return false;
            }
        }

        if let Some(risk) = self.risk {
            if scoring::risk_level(scoring::risk_score(pool)) != risk {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Apr,
    Tvl,
    Volume24h,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

/// Filter then sort. The sort is stable, so equal keys keep the
/// order of the underlying snapshot.
pub fn apply(
    pools: &[Arc<PoolRecord>],
    query: &PoolQuery,
    sort: SortKey,
    dir: SortDir,
) -> Vec<Arc<PoolRecord>> {
    let mut out: Vec<Arc<PoolRecord>> = pools
        .iter()
        .filter(|p| query.matches(p))
        .cloned()
        .collect();

    out.sort_by(|a, b| {
        let ord = match sort {
            SortKey::Apr => cmp_f64(a.day.apr, b.day.apr),
            SortKey::Tvl => cmp_f64(a.tvl, b.tvl),
            SortKey::Volume24h => cmp_f64(a.day.volume, b.day.volume),
            SortKey::Name => a.name().cmp(&b.name()),
        };
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });

    out
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolListPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

/// Slice into fixed-size pages. Page numbers are 1-based; out-of-range
/// requests clamp to the valid range, never wrap.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> PoolListPage<T> {
    let total = items.len();
    let page_count = if total == 0 {
        1
    } else {
        (total + PAGE_SIZE - 1) / PAGE_SIZE
    };
    let page = page.clamp(1, page_count);
    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total);
    let items = if start >= total {
        Vec::new()
    } else {
        items[start..end].to_vec()
    };

    PoolListPage { items, page, page_count, total }
}
