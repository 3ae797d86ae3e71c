pub mod config;
pub mod request;
pub mod result;

pub use config::*;
pub use request::*;
pub use result::*;
