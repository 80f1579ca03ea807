//! CLI interface and argument parsing
//!
//! This module registers schema options on the command line, reads them
//! back, and generates shell completions.

pub mod app;
pub mod completion;
pub mod register;

// Re-export main types
pub use app::*;
pub use completion::*;
pub use register::*;
