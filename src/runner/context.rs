//! Execution context for a submission

use std::env;
use std::path::PathBuf;

/// Settings that govern how the rendered command is run
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory the scheduler command runs in
    pub working_dir: PathBuf,

    /// Print the command instead of running it
    pub dry_run: bool,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            dry_run: false,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
