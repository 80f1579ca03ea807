//! Settings parsing and option defaults
//!
//! This module handles discovery and parsing of schedrun.yml settings files
//! and the layering of option defaults.

pub mod defaults;
pub mod parse;
pub mod types;

// Re-export main types
pub use defaults::*;
pub use parse::*;
pub use types::*;
