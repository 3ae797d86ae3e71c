#[allow(clippy::module_inception)]
pub mod error;
pub mod catalog;
pub mod executor;
pub mod runner;

pub use catalog::{CatalogError, ResolveError};
pub use error::{CliError, ConfigError};
pub use executor::ExecutorError;
pub use runner::LaunchError;
