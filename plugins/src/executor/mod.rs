pub mod renderers;
pub mod strategies;

pub use renderers::{ChannelRendererPlugin, JsonlRendererPlugin, TextRendererPlugin};
pub use strategies::{AdaptiveConcurrencyPlugin, AdaptiveLimits, FixedConcurrencyPlugin};
