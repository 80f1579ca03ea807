//! Main CLI application

use crate::cli::{parse_shell, print_completion, SchemaCommand};
use crate::config::{load_settings, Fallbacks, Settings};
use crate::error::UsageError;
use crate::logging::{self, Verbosity};
use crate::models::Submission;
use crate::runner::{execute_submission, Context, TemplateStore};
use crate::Result;
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, ValueEnum};
use clap_complete::Shell;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Binary name
pub const APP_NAME: &str = "schedrun";

/// CLI application
#[derive(Debug)]
pub struct App {
    /// The submission command with every schema option registered
    schema: SchemaCommand<Submission>,
    /// Parsed settings
    settings: Settings,
    /// Settings file path, if one was found
    config_path: Option<PathBuf>,
}

impl App {
    /// Create a new app, discovering the settings file
    pub fn new() -> Result<Self> {
        let (settings, config_path) = load_settings(None)?;
        Self::from_settings(settings, config_path, Fallbacks::new().with_environment())
    }

    /// Create app with a specific settings file
    pub fn with_config_file(path: &Path) -> Result<Self> {
        let (settings, config_path) = load_settings(Some(path))?;
        Self::from_settings(settings, config_path, Fallbacks::new().with_environment())
    }

    /// Create app from already loaded settings
    ///
    /// The settings' `defaults` are layered under whatever environment
    /// lookup `fallbacks` carries.
    pub fn from_settings(
        settings: Settings,
        config_path: Option<PathBuf>,
        fallbacks: Fallbacks,
    ) -> Result<Self> {
        let fallbacks = fallbacks.with_settings(&settings);
        let schema = SchemaCommand::new(build_command(), &fallbacks)?;

        Ok(App {
            schema,
            settings,
            config_path,
        })
    }

    /// The clap command, for help and completion output
    pub fn command(&self) -> &Command {
        self.schema.command()
    }

    /// Settings file in use
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Run the application with command line arguments
    pub fn run(mut self, args: Vec<String>) -> Result<()> {
        // Completions must not depend on the required submission options
        if let Some(name) = extract_completions_arg(&args) {
            let cmd = self.schema.command_mut();
            let shell = parse_shell(&name).ok_or_else(|| invalid_shell(cmd, &name))?;
            print_completion(shell, cmd);
            return Ok(());
        }

        let matches = self.schema.try_get_matches_from(args)?;

        let verbosity = get_verbosity(&matches);
        logging::init(verbosity);

        match &self.config_path {
            Some(path) => debug!(path = %path.display(), "using settings file"),
            None => debug!("no settings file in use"),
        }

        let submission = self.schema.from_matches(&matches)?;
        debug!(scheduler = %submission.scheduler, job = %submission.job_parameters.job_name, "validated submission");

        let store = TemplateStore::from_settings(&self.settings)?;
        let rendered = store.render_submission(&submission)?;

        let ctx = Context::new().with_dry_run(matches.get_flag("dry-run"));
        execute_submission(&rendered, &ctx)?;

        Ok(())
    }
}

/// Build the base clap command with the application's own flags
fn build_command() -> Command {
    Command::new(APP_NAME)
        .version(crate::VERSION)
        .about("Submit jobs to a cluster scheduler")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to schedrun.yml settings file"),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print the scheduler command instead of running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no diagnostics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script and exit")
                .value_parser(value_parser!(Shell)),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<()> {
    run_from(std::env::args().collect())
}

/// Run the CLI application with explicit arguments
pub fn run_from(args: Vec<String>) -> Result<()> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let app = match extract_config_arg(&args) {
        Some(path) => App::with_config_file(&path)?,
        None => App::new()?,
    };

    app.run(args)
}

/// Extract --config argument before clap parsing
fn extract_config_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
        if let Some(path) = args[i].strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

/// Extract the --completions shell name before clap parsing
fn extract_completions_arg(args: &[String]) -> Option<String> {
    for i in 0..args.len() {
        if args[i] == "--completions" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(name) = args[i].strip_prefix("--completions=") {
            return Some(name.to_string());
        }
    }
    None
}

/// Usage error for a shell clap_complete does not know
fn invalid_shell(cmd: &mut Command, name: &str) -> UsageError {
    let possible: Vec<String> = Shell::value_variants()
        .iter()
        .filter_map(|shell| shell.to_possible_value())
        .map(|value| value.get_name().to_string())
        .collect();
    cmd.error(
        ErrorKind::InvalidValue,
        format!(
            "invalid shell '{}' for '--completions' [possible values: {}]",
            name,
            possible.join(", ")
        ),
    )
    .into()
}
