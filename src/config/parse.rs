//! Settings file parsing and discovery

use crate::config::types::Settings;
use crate::error::{ConfigError, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["schedrun.yml", "schedrun.yaml"];

/// Settings file name inside the per-user config directory
const USER_CONFIG_FILE: &str = "config.yml";

/// Find a settings file by searching the current directory and its parents
pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = env::current_dir().ok()?;
    find_config_file_from(current_dir)
}

/// Find a settings file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> Option<PathBuf> {
    let mut current_dir = start_dir;

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Per-user settings file, if the platform has a config directory
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "schedrun").map(|dirs| dirs.config_dir().join(USER_CONFIG_FILE))
}

/// Parse a settings file from a path
pub fn parse_settings_file(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_settings(&contents, Some(path))
}

/// Parse settings from a string
///
/// A relative template directory is resolved against the settings file's
/// own directory when `config_path` is given.
pub fn parse_settings(yaml: &str, config_path: Option<&Path>) -> Result<Settings> {
    let mut settings: Settings = if yaml.trim().is_empty() {
        Settings::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    if let (Some(templates), Some(path)) = (&settings.templates, config_path) {
        if templates.is_relative() {
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            settings.templates = Some(base_dir.join(templates));
        }
    }

    Ok(settings)
}

/// Load settings from an explicit file, or discover one
///
/// Discovery order: current directory and its parents, then the per-user
/// config directory. No file anywhere yields the built-in settings.
pub fn load_settings(explicit: Option<&Path>) -> Result<(Settings, Option<PathBuf>)> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                error: "file not found".to_string(),
            }
            .into());
        }
        let settings = parse_settings_file(path)?;
        check_templates_dir(&settings)?;
        return Ok((settings, Some(path.to_path_buf())));
    }

    let discovered = find_config_file().or_else(|| user_config_file().filter(|p| p.is_file()));

    match discovered {
        Some(path) => {
            debug!(path = %path.display(), "loading settings file");
            let settings = parse_settings_file(&path)?;
            check_templates_dir(&settings)?;
            Ok((settings, Some(path)))
        }
        None => {
            debug!("no settings file found, using built-in settings");
            Ok((Settings::default(), None))
        }
    }
}

fn check_templates_dir(settings: &Settings) -> Result<()> {
    match &settings.templates {
        Some(dir) if !dir.is_dir() => Err(ConfigError::Invalid(format!(
            "template directory '{}' does not exist",
            dir.display()
        ))
        .into()),
        _ => Ok(()),
    }
}
