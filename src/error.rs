//! Error types for schedrun

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for schedrun operations
pub type Result<T> = std::result::Result<T, SchedError>;

/// Main error type for schedrun
#[derive(Error, Debug)]
pub enum SchedError {
    /// A schema cannot be turned into command-line options
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Command-line usage errors (missing or malformed flags)
    #[error("{0}")]
    Usage(#[from] UsageError),

    /// Parsed input failed coercion or model rules
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Template lookup or rendering errors
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Settings file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Submission process errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SchedError {
    /// Process exit code for this error
    ///
    /// Usage errors follow clap's convention (2), everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            SchedError::Usage(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Errors raised while walking a schema definition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field '{field}' has unsupported type: {kind}")]
    UnsupportedType { field: String, kind: String },

    #[error("Field '{field}' is a union of incompatible kinds")]
    IncompatibleUnion { field: String },

    #[error("Invalid field name '{name}' in model '{model}' (expected lowercase letters, digits and '_')")]
    InvalidFieldName { model: String, name: String },

    #[error("Field '{name}' is declared more than once in model '{model}'")]
    DuplicateField { model: String, name: String },

    #[error("Option '--{flag}' clashes with a built-in flag")]
    ReservedFlag { flag: String },

    #[error("Option '--{flag}' is generated for more than one field")]
    DuplicateFlag { flag: String },
}

/// Command-line usage errors
#[derive(Error, Debug)]
pub enum UsageError {
    /// Errors reported by the argument parser (including help and version requests)
    #[error("{0}")]
    Clap(#[from] clap::Error),
}

impl UsageError {
    /// Exit code matching clap's own error reporting
    pub fn exit_code(&self) -> i32 {
        match self {
            UsageError::Clap(e) => e.exit_code(),
        }
    }
}

/// Rehydration failures, each carrying the dotted path of the offending field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{path}' is required")]
    Missing { path: String },

    #[error("invalid value for '{path}': {reason}")]
    Invalid { path: String, reason: String },

    #[error("{}: {reason}", model_label(.path))]
    Model { path: String, reason: String },
}

impl ValidationError {
    /// Dotted path of the field (or model) that failed; empty for the root model
    pub fn path(&self) -> &str {
        match self {
            ValidationError::Missing { path }
            | ValidationError::Invalid { path, .. }
            | ValidationError::Model { path, .. } => path,
        }
    }

    /// Human-readable failure reason
    pub fn reason(&self) -> String {
        match self {
            ValidationError::Missing { .. } => "value is required".to_string(),
            ValidationError::Invalid { reason, .. } | ValidationError::Model { reason, .. } => {
                reason.clone()
            }
        }
    }
}

fn model_label(path: &str) -> String {
    if path.is_empty() {
        "invalid submission".to_string()
    } else {
        format!("invalid '{}'", path)
    }
}

/// Template lookup and rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template '{name}' not found (available: {available})")]
    TemplateNotFound { name: String, available: String },

    #[error("Failed to parse template '{name}': {message}")]
    Parse { name: String, message: String },

    #[error("Failed to render template '{name}': {message}")]
    Render { name: String, message: String },

    #[error("Failed to read template '{path}': {error}")]
    ReadTemplate { path: PathBuf, error: String },

    #[error("Cannot expose submission to templates: {0}")]
    Context(String),

    #[error("Nothing to submit: 'interactive' is false and neither 'command' nor 'script' is set")]
    NothingToSubmit,
}

/// Settings file discovery and parsing errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Default given for unknown option '--{0}'")]
    UnknownDefault(String),
}

/// Submission process errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Rendered command is empty")]
    EmptyCommand,

    #[error("Cannot split rendered command into words: {0}")]
    Tokenize(String),

    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },
}

/// Specialized result type for schema operations
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Specialized result type for rehydration
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Specialized result type for rendering
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Specialized result type for settings operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
