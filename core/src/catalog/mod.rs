//! Script catalog: an immutable tree mirroring the script root on disk.
//!
//! The catalog only describes what is there. Whether a file is runnable is decided by
//! the [`resolver`](crate::resolver).

mod node;
mod scan;

pub use node::{NodeKind, ScriptNode, Walk};
pub use scan::{scan, Catalog, ScanWarning, WarningKind};
