//! Execution engine: one script, one child process.

mod capture;
mod engine;
mod interpreter;
mod io_pump;
mod traits;
pub mod types;

pub use capture::CaptureBuffer;
pub use engine::{EngineOpts, ExecutionEngine};
pub use interpreter::{Interpreter, InterpreterTable};
pub use traits::{RunnerPlugin, RunnerSession};
pub use types::{ExitInfo, RunnerStartArgs, Signal};
