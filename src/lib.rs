//! Schedrun - cluster job submission from typed schemas
//!
//! Schedrun derives its command line from nested schema models, rebuilds
//! validated models from the parsed flags, and renders them into scheduler
//! submission commands (Slurm, PBS).

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod runner;
pub mod schema;

// Re-export commonly used types
pub use error::{Result, SchedError};

/// Current version of schedrun
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
