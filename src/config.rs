use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub price: PriceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_pool_type")]
    pub pool_type: String,
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PriceConfig {
    #[serde(default = "default_price_base_url")]
    pub base_url: String,
    #[serde(default = "default_asset")]
    pub asset: String,
    #[serde(default = "default_cache_secs")]
    pub cache_secs: u64,
}

fn default_base_url() -> String { "https://api-v3.raydium.io".to_string() }
fn default_pool_type() -> String { "all".to_string() }
fn default_sort_field() -> String { "default".to_string() }
fn default_sort_direction() -> String { "desc".to_string() }
fn default_page_size() -> u32 { 100 }
fn default_max_pages() -> u32 { 10 }
fn default_refresh_secs() -> u64 { 60 }
fn default_price_base_url() -> String { "https://api.coingecko.com/api/v3".to_string() }
fn default_asset() -> String { "solana".to_string() }
fn default_cache_secs() -> u64 { 60 }

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            pool_type: default_pool_type(),
            sort_field: default_sort_field(),
            sort_direction: default_sort_direction(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            base_url: default_price_base_url(),
            asset: default_asset(),
            cache_secs: default_cache_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string("config.toml")?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 3000
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.base_url, "https://api-v3.raydium.io");
        assert_eq!(config.upstream.page_size, 100);
        assert_eq!(config.upstream.refresh_secs, 60);
        assert_eq!(config.price.asset, "solana");
    }
}
