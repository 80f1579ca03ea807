//! Integration tests for settings loading and option defaults

mod common;

use common::{create_test_settings, create_test_settings_in_subdir, write_template};
use schedrun::cli::App;
use schedrun::config::{find_config_file_from, load_settings, parse_settings_file, Fallbacks};
use schedrun::runner::TemplateStore;
use schedrun::SchedError;
use std::fs;

#[test]
fn test_load_explicit_settings_file() {
    let yaml = r#"
defaults:
  scheduler: pbs
  n-cores: 16
"#;
    let (_temp_dir, config_path) = create_test_settings(yaml);
    let (settings, path) = load_settings(Some(&config_path)).unwrap();

    assert_eq!(path, Some(config_path));
    assert_eq!(settings.defaults.get("scheduler").map(String::as_str), Some("pbs"));
    assert_eq!(settings.defaults.get("n-cores").map(String::as_str), Some("16"));
}

#[test]
fn test_load_missing_explicit_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.yml");
    assert!(matches!(
        load_settings(Some(&missing)),
        Err(SchedError::Config(_))
    ));
}

#[test]
fn test_find_settings_in_parent_directory() {
    let (_temp_dir, config_path, sub_dir) = create_test_settings_in_subdir("defaults: {}\n");
    let found = find_config_file_from(sub_dir).unwrap();
    assert_eq!(found, config_path);
}

#[test]
fn test_yaml_extension_is_found() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_path = temp_dir.path().join("schedrun.yaml");
    fs::write(&config_path, "").unwrap();
    assert_eq!(find_config_file_from(temp_dir.path().to_path_buf()), Some(config_path));
}

#[test]
fn test_malformed_settings() {
    let (_temp_dir, config_path) = create_test_settings("defaults: [1, 2\n");
    assert!(parse_settings_file(&config_path).is_err());
}

#[test]
fn test_relative_template_dir() {
    let (temp_dir, config_path) = create_test_settings("templates: site-templates\n");
    let template_dir = temp_dir.path().join("site-templates");
    fs::create_dir(&template_dir).unwrap();
    write_template(
        &template_dir,
        "slurm_submission.liquid",
        "echo {{ submission.scheduler }}",
    );

    let settings = parse_settings_file(&config_path).unwrap();
    assert_eq!(settings.templates.as_deref(), Some(template_dir.as_path()));

    let store = TemplateStore::from_settings(&settings).unwrap();
    assert_eq!(store.dir(), Some(template_dir.as_path()));
    assert!(store
        .available()
        .contains(&"slurm_submission.liquid".to_string()));
}

#[test]
fn test_settings_defaults_reach_the_command_line() {
    let (_temp_dir, config_path) = create_test_settings("defaults:\n  scheduler: pbs\n");
    let (settings, path) = load_settings(Some(&config_path)).unwrap();
    let app = App::from_settings(settings, path, Fallbacks::new()).unwrap();

    let scheduler = app
        .command()
        .get_arguments()
        .find(|arg| arg.get_long() == Some("scheduler"))
        .unwrap();
    assert!(!scheduler.is_required_set());
    assert_eq!(
        scheduler
            .get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect::<Vec<_>>(),
        vec!["pbs"]
    );
}

#[test]
fn test_environment_beats_settings_default() {
    let (_temp_dir, config_path) = create_test_settings("defaults:\n  scheduler: pbs\n");
    let (settings, path) = load_settings(Some(&config_path)).unwrap();
    let fallbacks = Fallbacks::new()
        .with_env_lookup(|name| (name == "SCHEDRUN_SCHEDULER").then(|| "slurm".to_string()));
    let app = App::from_settings(settings, path, fallbacks).unwrap();

    let scheduler = app
        .command()
        .get_arguments()
        .find(|arg| arg.get_long() == Some("scheduler"))
        .unwrap();
    assert_eq!(scheduler.get_default_values()[0].to_string_lossy(), "slurm");
}

#[test]
fn test_unknown_default_is_rejected() {
    let (_temp_dir, config_path) = create_test_settings("defaults:\n  partition: gpu\n");
    let (settings, path) = load_settings(Some(&config_path)).unwrap();
    let err = App::from_settings(settings, path, Fallbacks::new()).unwrap_err();
    assert!(err.to_string().contains("partition"));
}
