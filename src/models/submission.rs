//! Job submission request

use crate::error::{ValidationError, ValidationResult};
use crate::models::JobParameters;
use crate::schema::{FieldDef, LeafKind, ModelDef, NamespacedKey, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Supported job scheduling systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler {
    Slurm,
    Pbs,
}

impl Scheduler {
    /// Every scheduler, in help order
    pub const ALL: [Scheduler; 2] = [Scheduler::Slurm, Scheduler::Pbs];

    /// Lowercase names accepted on the command line
    pub const NAMES: &'static [&'static str] = &["slurm", "pbs"];

    /// Lowercase name, also the template prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheduler::Slurm => "slurm",
            Scheduler::Pbs => "pbs",
        }
    }
}

impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A job request for the scheduler
///
/// A job runs either a command string, a shell script, or an interactive
/// session; exactly one of the three must be given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub scheduler: Scheduler,
    pub job_parameters: JobParameters,
    pub interactive: Option<bool>,
    pub command: Option<String>,
    pub script: Option<PathBuf>,
}

/// How the job's work is supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionMode<'a> {
    Command(&'a str),
    Script(&'a PathBuf),
    Interactive(bool),
}

impl Submission {
    /// The single submission mode of a validated submission
    pub fn mode(&self) -> Option<SubmissionMode<'_>> {
        match (&self.command, &self.script, self.interactive) {
            (Some(command), None, None) => Some(SubmissionMode::Command(command)),
            (None, Some(script), None) => Some(SubmissionMode::Script(script)),
            (None, None, Some(interactive)) => Some(SubmissionMode::Interactive(interactive)),
            _ => None,
        }
    }
}

impl Schema for Submission {
    fn model() -> ModelDef {
        ModelDef::new("Submission")
            .field(
                FieldDef::leaf("scheduler", LeafKind::Choice(Scheduler::NAMES))
                    .required()
                    .describe("Job scheduling system to use."),
            )
            .field(FieldDef::nested("job_parameters", JobParameters::model()).required())
            .field(FieldDef::leaf("interactive", LeafKind::Bool).describe(
                "Whether to launch an interactive job (e.g., as opposed to a batch submission). \
                 'false' on its own leaves nothing to submit and is rejected.",
            ))
            .field(
                FieldDef::leaf("command", LeafKind::string())
                    .describe("Simple command (string) to submit."),
            )
            .field(
                FieldDef::leaf("script", LeafKind::Path)
                    .describe("Shell script (file) to submit for processing."),
            )
    }

    fn check(&self, path: &NamespacedKey) -> ValidationResult<()> {
        self.job_parameters.check(&path.child("job_parameters"))?;

        let supplied = [
            self.command.is_some(),
            self.script.is_some(),
            self.interactive.is_some(),
        ]
        .iter()
        .filter(|supplied| **supplied)
        .count();

        if supplied != 1 {
            return Err(ValidationError::Model {
                path: path.to_string(),
                reason: "received insufficient or contradictory submission types; \
                         supply exactly one of 'command', 'script', or 'interactive'"
                    .to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Submission {
        Submission {
            scheduler: Scheduler::Slurm,
            job_parameters: JobParameters {
                n_cores: 2,
                mem_per_core: 1024,
                job_name: "test".to_string(),
                n_cores_per_node: None,
                run_time: None,
                n_gpus: None,
                mem_per_gpu: None,
            },
            interactive: None,
            command: None,
            script: None,
        }
    }

    #[test]
    fn test_exactly_one_mode() {
        let root = NamespacedKey::root();

        let none = submission();
        assert!(matches!(none.check(&root), Err(ValidationError::Model { .. })));
        assert_eq!(none.mode(), None);

        let mut command = submission();
        command.command = Some("hostname".to_string());
        assert!(command.check(&root).is_ok());
        assert_eq!(command.mode(), Some(SubmissionMode::Command("hostname")));

        let mut two = command.clone();
        two.interactive = Some(false);
        assert!(two.check(&root).is_err());

        let mut three = two.clone();
        three.script = Some(PathBuf::from("job.sh"));
        assert!(three.check(&root).is_err());
    }

    #[test]
    fn test_interactive_false_counts_as_supplied() {
        let mut s = submission();
        s.interactive = Some(false);
        assert!(s.check(&NamespacedKey::root()).is_ok());
        assert_eq!(s.mode(), Some(SubmissionMode::Interactive(false)));
    }

    #[test]
    fn test_scheduler_names_match_variants() {
        let names: Vec<&str> = Scheduler::ALL.iter().map(Scheduler::as_str).collect();
        assert_eq!(names, Scheduler::NAMES);
    }
}
