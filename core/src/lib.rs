pub mod api;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod executor;
pub mod resolver;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;
