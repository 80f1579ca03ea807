//! End-to-end tests of the schedrun binary

mod common;

use assert_cmd::Command;
use common::{create_test_settings, submission_args, write_template};
use predicates::prelude::*;
use std::path::Path;

/// Binary invocation pinned to an explicit, empty settings file
fn schedrun(settings: &Path) -> Command {
    let mut cmd = Command::cargo_bin("schedrun").unwrap();
    cmd.arg("--config").arg(settings);
    if let Some(dir) = settings.parent() {
        cmd.current_dir(dir);
    }
    for var in ["SCHEDRUN_SCHEDULER", "SCHEDRUN_N_CORES", "SCHEDRUN_MEM_PER_CORE", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

fn dry_run_words(settings: &Path, args: &[String]) -> Vec<String> {
    let output = schedrun(settings)
        .arg("--dry-run")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);
    shlex::split(String::from_utf8(output.stdout).unwrap().trim()).unwrap()
}

#[test]
fn test_dry_run_slurm() {
    let (_temp_dir, settings) = create_test_settings("");
    let words = dry_run_words(&settings, &submission_args("slurm"));

    assert_eq!(words[0], "sbatch");
    assert!(words.contains(&"--ntasks=4".to_string()));
    assert!(words.contains(&"--mem-per-cpu=2048".to_string()));
    assert_eq!(words.last().unwrap(), "--wrap=python train.py --epochs 3");
}

#[test]
fn test_dry_run_pbs() {
    let (_temp_dir, settings) = create_test_settings("");
    let words = dry_run_words(&settings, &submission_args("pbs"));

    assert_eq!(words[0], "qsub");
    assert!(words.contains(&"select=1:ncpus=4:mem=8192mb".to_string()));
    assert_eq!(words.last().unwrap(), "python train.py --epochs 3");
}

#[test]
fn test_generated_job_names_differ() {
    let (_temp_dir, settings) = create_test_settings("");
    let job_name = |words: Vec<String>| {
        words
            .into_iter()
            .find_map(|w| w.strip_prefix("--job-name=").map(String::from))
            .unwrap()
    };

    let first = job_name(dry_run_words(&settings, &submission_args("slurm")));
    let second = job_name(dry_run_words(&settings, &submission_args("slurm")));
    assert_eq!(first.len(), 32);
    assert_ne!(first, second);
}

#[test]
fn test_help_hides_internal_names() {
    let (_temp_dir, settings) = create_test_settings("");
    schedrun(&settings)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mem-per-core <MEM_PER_CORE>"))
        .stdout(predicate::str::contains("--scheduler <SCHEDULER>"))
        .stdout(predicate::str::contains("[choices: slurm, pbs]"))
        .stdout(predicate::str::contains("job_parameters").not())
        .stdout(predicate::str::contains("mem_per_core").not());
}

#[test]
fn test_version() {
    let (_temp_dir, settings) = create_test_settings("");
    schedrun(&settings)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_required_option() {
    let (_temp_dir, settings) = create_test_settings("");
    schedrun(&settings)
        .args(["--scheduler", "slurm", "--command", "hostname"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--n-cores"));
}

#[test]
fn test_contradictory_modes() {
    let (_temp_dir, settings) = create_test_settings("");
    schedrun(&settings)
        .arg("--dry-run")
        .args(submission_args("slurm"))
        .args(["--script", "job.sh"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("exactly one"));
}

#[test]
fn test_interactive_false_alone_is_rejected() {
    let (_temp_dir, settings) = create_test_settings("");
    schedrun(&settings)
        .args(["--dry-run", "--scheduler", "slurm", "--n-cores", "1", "--mem-per-core", "1"])
        .args(["--interactive", "false"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Nothing to submit"));
}

#[test]
fn test_invalid_value_names_field() {
    let (_temp_dir, settings) = create_test_settings("");
    schedrun(&settings)
        .args(["--scheduler", "sge", "--n-cores", "1", "--mem-per-core", "1"])
        .args(["--command", "hostname"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("scheduler"));
}

#[test]
fn test_settings_defaults_fill_required() {
    let (_temp_dir, settings) =
        create_test_settings("defaults:\n  scheduler: pbs\n  n-cores: 2\n  mem-per-core: 100\n");
    let words = dry_run_words(&settings, &["--command".to_string(), "hostname".to_string()]);
    assert_eq!(words[0], "qsub");
    assert!(words.contains(&"select=1:ncpus=2:mem=200mb".to_string()));
}

#[test]
fn test_environment_default() {
    let (_temp_dir, settings) = create_test_settings("defaults:\n  scheduler: slurm\n");
    let output = schedrun(&settings)
        .env("SCHEDRUN_SCHEDULER", "pbs")
        .args(["--dry-run", "--n-cores", "1", "--mem-per-core", "1", "--interactive"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let words = shlex::split(String::from_utf8(output.stdout).unwrap().trim()).unwrap();
    assert_eq!(&words[..2], &["qsub", "-I"]);
}

#[test]
fn test_template_override() {
    let (temp_dir, settings) = create_test_settings("templates: tpl\n");
    let dir = temp_dir.path().join("tpl");
    std::fs::create_dir(&dir).unwrap();
    write_template(
        &dir,
        "slurm_submission.liquid",
        "echo {{ submission.job_parameters.job_name }} {{ submission.command }}",
    );

    let mut args = submission_args("slurm");
    args.extend(["--job-name".to_string(), "my run".to_string()]);
    let words = dry_run_words(&settings, &args);
    assert_eq!(words, vec!["echo", "my run", "python train.py --epochs 3"]);
}

#[test]
fn test_submission_runs_without_dry_run() {
    let (temp_dir, settings) = create_test_settings("templates: .\n");
    write_template(
        temp_dir.path(),
        "slurm_submission.liquid",
        "touch {{ submission.job_parameters.job_name }}",
    );

    let mut args = submission_args("slurm");
    args.extend(["--job-name".to_string(), "submitted".to_string()]);
    schedrun(&settings).args(&args).assert().success();
    assert!(temp_dir.path().join("submitted").exists());
}

#[test]
fn test_completions() {
    let (_temp_dir, settings) = create_test_settings("");
    schedrun(&settings)
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--mem-per-core"));
}

#[test]
fn test_completions_unknown_shell() {
    let (_temp_dir, settings) = create_test_settings("");
    schedrun(&settings)
        .args(["--completions", "cmd"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid shell 'cmd'"))
        .stderr(predicate::str::contains("required arguments").not());
}

#[test]
fn test_missing_settings_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    schedrun(&temp_dir.path().join("absent.yml"))
        .args(submission_args("slurm"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.yml"));
}
