//! Settings file types
//!
//! This module defines the data structures that represent a schedrun.yml file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Directory holding template overrides (`<scheduler>_submission.liquid`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,

    /// Site-wide option defaults keyed by visible flag name
    #[serde(
        default,
        skip_serializing_if = "HashMap::is_empty",
        deserialize_with = "deserialize_defaults"
    )]
    pub defaults: HashMap<String, String>,
}

/// Custom deserializer for defaults that accepts any scalar value
///
/// Options are parsed as strings, so numbers and booleans are kept in their
/// textual form.
fn deserialize_defaults<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Mapping(mapping) => {
            let mut defaults = HashMap::new();
            for (key, value) in mapping {
                let key = match key {
                    Value::String(s) => s,
                    _ => return Err(D::Error::custom("default names must be strings")),
                };
                let value = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => {
                        return Err(D::Error::custom(format!(
                            "default for '{}' must be a string, number or boolean",
                            key
                        )))
                    }
                };
                defaults.insert(key, value);
            }
            Ok(defaults)
        }
        // Null or not present
        Value::Null => Ok(HashMap::new()),
        _ => Err(D::Error::custom("defaults must be a mapping")),
    }
}
