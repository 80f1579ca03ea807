//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a schedrun.yml file
pub fn create_test_settings(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("schedrun.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test settings file with a subdirectory below it
pub fn create_test_settings_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("schedrun.yml");
    let sub_dir = temp_dir.path().join("subdir");

    fs::write(&config_path, content).unwrap();
    fs::create_dir(&sub_dir).unwrap();

    (temp_dir, config_path, sub_dir)
}

/// Write a template into `dir`
pub fn write_template(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Arguments for a complete, valid command-mode submission
pub fn submission_args(scheduler: &str) -> Vec<String> {
    [
        "--scheduler",
        scheduler,
        "--n-cores",
        "4",
        "--mem-per-core",
        "2048",
        "--command",
        "python train.py --epochs 3",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
