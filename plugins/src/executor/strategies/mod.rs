pub mod concurrency;

pub use concurrency::{AdaptiveConcurrencyPlugin, AdaptiveLimits, FixedConcurrencyPlugin};
