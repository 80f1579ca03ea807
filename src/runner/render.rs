//! Submission rendering
//!
//! Each scheduler has a Liquid template named `<scheduler>_submission.liquid`.
//! The built-in templates are compiled in; a template directory from the
//! settings file can override any of them.

use crate::config::Settings;
use crate::error::{RenderError, RenderResult};
use crate::models::{Scheduler, Submission, SubmissionMode};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of submission templates
pub const TEMPLATE_EXTENSION: &str = "liquid";

/// Templates shipped with schedrun
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "slurm_submission.liquid",
        include_str!("../../templates/slurm_submission.liquid"),
    ),
    (
        "pbs_submission.liquid",
        include_str!("../../templates/pbs_submission.liquid"),
    ),
];

/// Template name for a scheduler
pub fn template_name(scheduler: Scheduler) -> String {
    format!("{}_submission.{}", scheduler.as_str(), TEMPLATE_EXTENSION)
}

/// Lookup and rendering of submission templates
pub struct TemplateStore {
    /// Directory searched before the built-in templates
    dir: Option<PathBuf>,
    parser: liquid::Parser,
}

impl TemplateStore {
    /// Store with only the built-in templates
    pub fn builtin() -> RenderResult<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| RenderError::Parse {
                name: "<parser>".to_string(),
                message: e.to_string(),
            })?;
        Ok(TemplateStore { dir: None, parser })
    }

    /// Store that prefers templates found in `dir`
    pub fn with_dir(dir: impl Into<PathBuf>) -> RenderResult<Self> {
        let mut store = Self::builtin()?;
        store.dir = Some(dir.into());
        Ok(store)
    }

    /// Store configured from settings
    pub fn from_settings(settings: &Settings) -> RenderResult<Self> {
        match &settings.templates {
            Some(dir) => Self::with_dir(dir),
            None => Self::builtin(),
        }
    }

    /// Override directory, if any
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Names of every template that can be looked up, sorted
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_TEMPLATES
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();

        if let Some(dir) = &self.dir {
            let pattern = dir.join(format!("*.{}", TEMPLATE_EXTENSION));
            if let Ok(paths) = glob::glob(&pattern.to_string_lossy()) {
                names.extend(paths.flatten().filter_map(|path| {
                    path.file_name().map(|name| name.to_string_lossy().into_owned())
                }));
            }
        }

        names.sort();
        names.dedup();
        names
    }

    /// Template source by name, preferring the override directory
    pub fn source(&self, name: &str) -> RenderResult<String> {
        if let Some(dir) = &self.dir {
            let path = dir.join(name);
            if path.is_file() {
                debug!(template = %path.display(), "using template override");
                return fs::read_to_string(&path).map_err(|e| RenderError::ReadTemplate {
                    path,
                    error: e.to_string(),
                });
            }
        }

        BUILTIN_TEMPLATES
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, source)| source.to_string())
            .ok_or_else(|| RenderError::TemplateNotFound {
                name: name.to_string(),
                available: self.available().join(", "),
            })
    }

    /// Render the named template with the given globals
    pub fn render(&self, name: &str, globals: &liquid::Object) -> RenderResult<String> {
        let source = self.source(name)?;
        let template = self.parser.parse(&source).map_err(|e| RenderError::Parse {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        template.render(globals).map_err(|e| RenderError::Render {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    /// Render the submission command for `submission`'s scheduler
    ///
    /// A submission whose only mode is `interactive: false` has no work to
    /// hand to the scheduler and is rejected before any template runs.
    pub fn render_submission(&self, submission: &Submission) -> RenderResult<String> {
        if submission.mode() == Some(SubmissionMode::Interactive(false)) {
            return Err(RenderError::NothingToSubmit);
        }

        let name = template_name(submission.scheduler);
        let globals = submission_globals(submission)?;
        let rendered = self.render(&name, &globals)?;
        debug!(template = %name, "rendered submission");
        Ok(rendered)
    }
}

/// Template globals: the submission under the name `submission`
///
/// Every string value is shell-quoted first, so that splitting the rendered
/// text into words keeps each value intact.
pub fn submission_globals(submission: &Submission) -> RenderResult<liquid::Object> {
    let value =
        serde_yaml::to_value(submission).map_err(|e| RenderError::Context(e.to_string()))?;
    let quoted = quote_strings(value)?;
    let value =
        liquid::model::to_value(&quoted).map_err(|e| RenderError::Context(e.to_string()))?;

    let mut globals = liquid::Object::new();
    globals.insert("submission".into(), value);
    Ok(globals)
}

fn quote_strings(value: Value) -> RenderResult<Value> {
    match value {
        Value::String(s) => shlex::try_quote(&s)
            .map(|quoted| Value::String(quoted.into_owned()))
            .map_err(|e| RenderError::Context(format!("cannot quote '{}': {}", s, e))),
        Value::Mapping(mapping) => {
            let mut quoted = serde_yaml::Mapping::new();
            for (key, value) in mapping {
                quoted.insert(key, quote_strings(value)?);
            }
            Ok(Value::Mapping(quoted))
        }
        Value::Sequence(items) => items
            .into_iter()
            .map(quote_strings)
            .collect::<RenderResult<Vec<Value>>>()
            .map(Value::Sequence),
        other => Ok(other),
    }
}
