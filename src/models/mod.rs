//! Scheduler domain models
//!
//! These are the concrete schema models the command line is generated from.

pub mod job;
pub mod submission;

// Re-export main types
pub use job::*;
pub use submission::*;
