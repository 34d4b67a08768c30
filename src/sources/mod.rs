pub mod raydium;
pub mod price;

use async_trait::async_trait;
use crate::models::PoolPage;

#[async_trait]
pub trait PoolSource: Send + Sync {
    fn name(&self) -> &'static str;
    /// Fetch one 1-based page of the pool listing.
    async fn fetch_page(&self, page: u32) -> Result<PoolPage, SourceError>;
}

#[derive(Debug)]
pub enum SourceError {
    Network(String),
    Parse(String),
    RateLimit,
    /// Non-2xx status, or a 2xx envelope with success=false (status 0).
    Upstream(u16),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Network(e) => write!(f, "Network error: {}", e),
            SourceError::Parse(e) => write!(f, "Parse error: {}", e),
            SourceError::RateLimit => write!(f, "Rate limited"),
            SourceError::Upstream(status) => write!(f, "Upstream error: status {}", status),
        }
    }
}
