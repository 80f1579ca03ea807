//! Option registration
//!
//! Turns flattened option descriptors into clap arguments and reads the
//! parsed values back out as a [`FlatInput`].

use crate::config::Fallbacks;
use crate::error::{Result, SchemaError, SchemaResult, UsageError};
use crate::schema::{
    flatten, rehydrate, FlatInput, LeafKind, NamespacedKey, OptionDescriptor, Schema,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::marker::PhantomData;

/// Flags owned by the application itself
pub const RESERVED_FLAGS: &[&str] = &[
    "help",
    "version",
    "config",
    "dry-run",
    "verbose",
    "quiet",
    "silent",
    "completions",
];

/// A descriptor paired with the flag it is registered under
#[derive(Debug, Clone, PartialEq)]
pub struct BoundOption {
    pub flag: String,
    pub descriptor: OptionDescriptor,
}

impl BoundOption {
    /// Clap argument id: the dotted key, never shown to users
    pub fn id(&self) -> String {
        self.descriptor.key.to_string()
    }
}

/// Give every descriptor a unique flag
///
/// Leaves that share a name across nested models are registered under their
/// full path instead (`job_parameters.name` becomes `--job-parameters-name`).
pub fn assign_flags(descriptors: Vec<OptionDescriptor>) -> SchemaResult<Vec<BoundOption>> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for descriptor in &descriptors {
        *counts.entry(descriptor.flag.clone()).or_default() += 1;
    }

    let mut seen = HashSet::new();
    let mut bound = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let flag = if counts[&descriptor.flag] > 1 {
            qualified_flag(&descriptor)
        } else {
            descriptor.flag.clone()
        };

        if RESERVED_FLAGS.contains(&flag.as_str()) {
            return Err(SchemaError::ReservedFlag { flag });
        }
        if !seen.insert(flag.clone()) {
            return Err(SchemaError::DuplicateFlag { flag });
        }

        bound.push(BoundOption { flag, descriptor });
    }

    Ok(bound)
}

fn qualified_flag(descriptor: &OptionDescriptor) -> String {
    descriptor
        .key
        .segments()
        .iter()
        .map(|segment| segment.replace('_', "-"))
        .collect::<Vec<_>>()
        .join("-")
}

/// Add one argument per option to `command`
pub fn register(mut command: Command, options: &[BoundOption], fallbacks: &Fallbacks) -> Command {
    for option in options {
        command = command.arg(build_arg(option, fallbacks));
    }
    command
}

fn build_arg(option: &BoundOption, fallbacks: &Fallbacks) -> Arg {
    let descriptor = &option.descriptor;

    let mut arg = Arg::new(option.id())
        .long(option.flag.clone())
        .value_name(option.flag.to_uppercase().replace('-', "_"))
        .help(help_text(descriptor))
        .action(ArgAction::Set);

    if descriptor.kind == LeafKind::Bool {
        arg = arg.num_args(0..=1).default_missing_value("true");
    }

    let default = match fallbacks.get(&option.flag) {
        Some(value) => Some(value),
        None => {
            if descriptor.default_generated {
                arg = arg.hide_default_value(true);
            }
            descriptor.default.clone()
        }
    };

    match default {
        Some(value) => arg.default_value(value),
        None => arg.required(descriptor.required),
    }
}

/// Help line for an option: its description plus any allowed values
fn help_text(descriptor: &OptionDescriptor) -> String {
    let description = descriptor.description.clone().unwrap_or_default();
    match &descriptor.kind {
        LeafKind::Choice(choices) => {
            let hint = format!("[choices: {}]", choices.join(", "));
            if description.is_empty() {
                hint
            } else {
                format!("{} {}", description, hint)
            }
        }
        _ => description,
    }
}

/// Read every registered option back out of parsed matches
///
/// Options that were neither given nor defaulted are recorded as absent.
pub fn collect(matches: &ArgMatches, options: &[BoundOption]) -> FlatInput {
    options
        .iter()
        .map(|option| {
            let value = matches.get_one::<String>(&option.id()).cloned();
            (option.descriptor.key.clone(), value)
        })
        .collect()
}

/// A clap command carrying the options of one root schema model
#[derive(Debug)]
pub struct SchemaCommand<S: Schema> {
    command: Command,
    options: Vec<BoundOption>,
    _model: PhantomData<S>,
}

impl<S: Schema> SchemaCommand<S> {
    /// Flatten `S` and register its options on `command`
    ///
    /// Generated defaults are produced once here, so each `SchemaCommand`
    /// stands for a single invocation.
    pub fn new(command: Command, fallbacks: &Fallbacks) -> Result<Self> {
        let descriptors = flatten(&S::model(), &NamespacedKey::root())?;
        let options = assign_flags(descriptors)?;
        fallbacks.check_known(options.iter().map(|o| o.flag.as_str()))?;

        let command = register(command, &options, fallbacks);
        Ok(SchemaCommand {
            command,
            options,
            _model: PhantomData,
        })
    }

    /// The command with every option registered
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Mutable access, e.g. for help or completion generation
    pub fn command_mut(&mut self) -> &mut Command {
        &mut self.command
    }

    /// Registered options in schema order
    pub fn options(&self) -> &[BoundOption] {
        &self.options
    }

    /// Parse arguments into matches; usage problems become clap errors
    pub fn try_get_matches_from<I, T>(&self, args: I) -> Result<ArgMatches>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.command
            .clone()
            .try_get_matches_from(args)
            .map_err(|e| UsageError::from(e).into())
    }

    /// Rebuild the model from parsed matches
    pub fn from_matches(&self, matches: &ArgMatches) -> Result<S> {
        rehydrate(&collect(matches, &self.options))
    }

    /// Parse arguments straight into the model
    pub fn try_parse_from<I, T>(&self, args: I) -> Result<S>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.try_get_matches_from(args)?;
        self.from_matches(&matches)
    }
}
