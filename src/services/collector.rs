use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;
use crate::models::PoolRecord;
use crate::sources::{PoolSource, SourceError};
use super::scoring::MIN_DISPLAY_APR;
use super::store::PoolStore;

const PAGE_FETCH_CONCURRENCY: usize = 4;

#[derive(Debug, Default)]
pub struct CollectorStats {
    pub total_requests: AtomicU64,
    pub successful: AtomicU64,
    pub failed: AtomicU64,
    pub pools_kept: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct RefreshSummary {
    pub generation: u64,
    pub fetched: usize,
    pub kept: usize,
    pub pages: u32,
    pub applied: bool,
}

/// Drives the pool source on a fixed cycle: fetch all pages, drop
/// ineligible pools, offer the result to the store as one snapshot.
pub struct PoolCollector {
    source: Arc<dyn PoolSource>,
    store: Arc<PoolStore>,
    max_pages: u32,
    generation: AtomicU64,
    semaphore: Arc<Semaphore>,
    stats: CollectorStats,
}

impl PoolCollector {
    pub fn new(source: Arc<dyn PoolSource>, store: Arc<PoolStore>, max_pages: u32) -> Self {
        Self {
            source,
            store,
            max_pages: max_pages.max(1),
            generation: AtomicU64::new(0),
            semaphore: Arc::new(Semaphore::new(PAGE_FETCH_CONCURRENCY)),
            stats: CollectorStats::default(),
        }
    }

    pub async fn refresh(&self) -> Result<RefreshSummary, SourceError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let first = match self.source.fetch_page(1).await {
            Ok(page) => {
                self.stats.successful.fetch_add(1, Ordering::Relaxed);
                page
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        // The upstream reports the total count; infer the page count from
        // what one page holds and cap the walk.
        let page_size = first.records.len().max(1);
        let total_pages = ((first.count as usize + page_size - 1) / page_size) as u32;
        let last_page = if first.has_next_page && self.max_pages >= 2 {
            total_pages.clamp(2, self.max_pages)
        } else {
            1
        };

        let mut records = first.records;
        let mut pages_fetched = 1;

        if last_page > 1 {
            let results: Vec<(u32, Result<Vec<PoolRecord>, SourceError>)> =
                stream::iter(2..=last_page)
                    .map(|page| {
                        let source = self.source.clone();
                        let semaphore = self.semaphore.clone();
                        async move {
                            let _permit = semaphore.acquire().await.unwrap();
                            (page, source.fetch_page(page).await.map(|p| p.records))
                        }
                    })
                    .buffered(PAGE_FETCH_CONCURRENCY)
                    .collect()
                    .await;

            for (page, result) in results {
                self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
                match result {
                    Ok(page_records) => {
                        self.stats.successful.fetch_add(1, Ordering::Relaxed);
                        records.extend(page_records);
                        pages_fetched += 1;
                    }
                    Err(e) => {
                        self.stats.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!("Source {} error on page {}: {}", self.source.name(), page, e);
                    }
                }
            }
        }

        let fetched = records.len();
        let eligible: Vec<PoolRecord> = records
            .into_iter()
            .filter(|p| p.day.apr >= MIN_DISPLAY_APR)
            .collect();
        let kept = eligible.len();
        self.stats.pools_kept.store(kept as u64, Ordering::Relaxed);

        let applied = self.store.apply(generation, eligible);
        if !applied {
            tracing::warn!(
                "Dropped stale snapshot (generation {} <= {})",
                generation,
                self.store.generation()
            );
        }

        Ok(RefreshSummary { generation, fetched, kept, pages: pages_fetched, applied })
    }

    pub fn stats(&self) -> &CollectorStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::models::{PeriodStats, PoolPage};

    fn pool(id: &str, apr: f64) -> PoolRecord {
        PoolRecord {
            id: id.to_string(),
            day: PeriodStats { apr, ..Default::default() },
            ..Default::default()
        }
    }

    struct StubSource {
        pages: Vec<Result<PoolPage, ()>>,
    }

    #[async_trait]
    impl PoolSource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch_page(&self, page: u32) -> Result<PoolPage, SourceError> {
            match self.pages.get(page as usize - 1) {
                Some(Ok(p)) => Ok(PoolPage {
                    records: p.records.clone(),
                    count: p.count,
                    has_next_page: p.has_next_page,
                }),
                Some(Err(())) => Err(SourceError::Upstream(500)),
                None => Err(SourceError::Upstream(404)),
            }
        }
    }

    #[tokio::test]
    async fn refresh_keeps_only_eligible_pools() {
        let source = Arc::new(StubSource {
            pages: vec![Ok(PoolPage {
                records: vec![pool("low", 3.9), pool("edge", 4.0), pool("high", 120.0)],
                count: 3,
                has_next_page: false,
            })],
        });
        let store = Arc::new(PoolStore::new());
        let collector = PoolCollector::new(source, store.clone(), 10);

        let summary = collector.refresh().await.unwrap();
        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.kept, 2);
        assert!(summary.applied);
        assert!(store.get("low").is_none());
        assert!(store.get("edge").is_some());
        assert!(store.get("high").is_some());
    }

    #[tokio::test]
    async fn refresh_walks_all_pages_in_order() {
        let source = Arc::new(StubSource {
            pages: vec![
                Ok(PoolPage {
                    records: vec![pool("p1", 10.0), pool("p2", 10.0)],
                    count: 6,
                    has_next_page: true,
                }),
                Ok(PoolPage {
                    records: vec![pool("p3", 10.0), pool("p4", 10.0)],
                    count: 6,
                    has_next_page: true,
                }),
                Ok(PoolPage {
                    records: vec![pool("p5", 10.0), pool("p6", 10.0)],
                    count: 6,
                    has_next_page: false,
                }),
            ],
        });
        let store = Arc::new(PoolStore::new());
        let collector = PoolCollector::new(source, store.clone(), 10);

        let summary = collector.refresh().await.unwrap();
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.kept, 6);
        let ids: Vec<String> = store.get_all().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5", "p6"]);
    }

    #[tokio::test]
    async fn failed_page_is_skipped_not_fatal() {
        let source = Arc::new(StubSource {
            pages: vec![
                Ok(PoolPage {
                    records: vec![pool("p1", 10.0), pool("p2", 10.0)],
                    count: 6,
                    has_next_page: true,
                }),
                Err(()),
                Ok(PoolPage {
                    records: vec![pool("p5", 10.0), pool("p6", 10.0)],
                    count: 6,
                    has_next_page: false,
                }),
            ],
        });
        let store = Arc::new(PoolStore::new());
        let collector = PoolCollector::new(source, store.clone(), 10);

        let summary = collector.refresh().await.unwrap();
        assert_eq!(summary.kept, 4);
        assert_eq!(collector.stats().failed.load(Ordering::Relaxed), 1);
        assert_eq!(collector.stats().successful.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn max_pages_caps_the_walk() {
        let page = |ids: [&str; 1]| {
            Ok(PoolPage {
                records: vec![pool(ids[0], 10.0)],
                count: 100,
                has_next_page: true,
            })
        };
        let source = Arc::new(StubSource {
            pages: vec![page(["p1"]), page(["p2"]), page(["p3"]), page(["p4"])],
        });
        let store = Arc::new(PoolStore::new());
        let collector = PoolCollector::new(source, store.clone(), 2);

        let summary = collector.refresh().await.unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn failed_first_page_leaves_previous_snapshot() {
        let store = Arc::new(PoolStore::new());
        let good = Arc::new(StubSource {
            pages: vec![Ok(PoolPage {
                records: vec![pool("keep", 10.0)],
                count: 1,
                has_next_page: false,
            })],
        });
        let collector = PoolCollector::new(good, store.clone(), 1);
        collector.refresh().await.unwrap();
        assert_eq!(store.len(), 1);

        let failing = Arc::new(StubSource { pages: vec![Err(())] });
        let broken = PoolCollector::new(failing, store.clone(), 1);
        assert!(broken.refresh().await.is_err());
        assert!(store.get("keep").is_some());
    }
}
