//! Submission rendering and execution
//!
//! This module turns a validated submission into scheduler command text and
//! runs it.

pub mod command;
pub mod context;
pub mod render;

// Re-export main types
pub use command::*;
pub use context::*;
pub use render::*;
