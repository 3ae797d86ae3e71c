mod load;
mod types;

pub use load::{default_log_dir, get_data_dir, load, load_default, load_from, validate};
pub use types::{
    AppConfig, BatchesConfig, ExecutionConfig, ExecutionMode, InterpretersConfig, LoggingConfig,
    OutputConfig, ScriptsConfig,
};
