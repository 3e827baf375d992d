pub mod aggregator;
pub mod handlers;
