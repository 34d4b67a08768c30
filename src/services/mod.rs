pub mod collector;
pub mod compare;
pub mod pipeline;
pub mod scoring;
pub mod store;
pub mod summary;

pub use collector::PoolCollector;
pub use store::PoolStore;
