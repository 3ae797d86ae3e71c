pub mod cli;
pub mod run;
pub mod targets;
pub mod tree;
