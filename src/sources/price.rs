use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use crate::config::PriceConfig;

/// Quote-asset price client. Any failure means "price unavailable",
/// never an error that fails the page.
pub struct PriceClient {
    client: Client,
    base_url: String,
    asset: String,
    cache_ttl: Duration,
    cache: DashMap<String, (f64, Instant)>,
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    usd: Option<f64>,
}

impl PriceClient {
    pub fn new(config: &PriceConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            asset: config.asset.clone(),
            cache_ttl: Duration::from_secs(config.cache_secs),
            cache: DashMap::new(),
        }
    }

    pub async fn usd_price(&self) -> Option<f64> {
        if let Some(hit) = self.cache.get(&self.asset) {
            if hit.1.elapsed() < self.cache_ttl {
                return Some(hit.0);
            }
        }

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url, self.asset
        );

        let resp = self.client.get(&url).send().await.ok()?;
        if !resp.status().is_success() {
            return None;
        }

        let body: HashMap<String, PriceEntry> = resp.json().await.ok()?;
        let price = body.get(&self.asset)?.usd?;

        self.cache.insert(self.asset.clone(), (price, Instant::now()));
        Some(price)
    }
}
