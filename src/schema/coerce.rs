//! Leaf value coercion
//!
//! Every option arrives as a string. These functions turn a raw string into a
//! typed value for its [`LeafKind`], or a human-readable reason why not.

use crate::schema::LeafKind;
use chrono::NaiveTime;
use serde_yaml::Value;

/// Coerce a raw string according to `kind`
pub fn coerce(kind: &LeafKind, raw: &str) -> Result<Value, String> {
    match kind {
        LeafKind::Str { min_len, max_len } => {
            let len = raw.chars().count();
            if let Some(min) = min_len {
                if len < *min {
                    return Err(format!("must be at least {} characters", min));
                }
            }
            if let Some(max) = max_len {
                if len > *max {
                    return Err(format!("must be at most {} characters", max));
                }
            }
            Ok(Value::String(raw.to_string()))
        }
        LeafKind::Int { min, max } => {
            let value: i64 = raw
                .trim()
                .parse()
                .map_err(|_| format!("'{}' is not a valid integer", raw))?;
            if let Some(min) = min {
                if value < *min {
                    return Err(format!("must be greater than or equal to {}", min));
                }
            }
            if let Some(max) = max {
                if value > *max {
                    return Err(format!("must be less than or equal to {}", max));
                }
            }
            Ok(Value::Number(value.into()))
        }
        LeafKind::Bool => parse_bool(raw).map(Value::Bool),
        LeafKind::Path => {
            if raw.is_empty() {
                return Err("path must not be empty".to_string());
            }
            Ok(Value::String(raw.to_string()))
        }
        LeafKind::Time => parse_time(raw).map(|t| Value::String(t.format("%H:%M:%S").to_string())),
        LeafKind::Choice(choices) => {
            let lowered = raw.trim().to_lowercase();
            if choices.contains(&lowered.as_str()) {
                Ok(Value::String(lowered))
            } else {
                Err(format!(
                    "'{}' is not one of: {}",
                    raw,
                    choices.join(", ")
                ))
            }
        }
    }
}

/// Parse a boolean in any of the usual spellings
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(format!("'{}' is not a valid boolean", raw)),
    }
}

/// Parse `H:M` or `H:M:S`, zero-filling each part to two digits first
pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    let padded: Vec<String> = raw
        .trim()
        .split(':')
        .map(|part| format!("{:0>2}", part))
        .collect();
    let normalized = padded.join(":");

    let parsed = match padded.len() {
        2 => NaiveTime::parse_from_str(&normalized, "%H:%M"),
        3 => NaiveTime::parse_from_str(&normalized, "%H:%M:%S"),
        _ => return Err(format!("'{}' is not a valid time (expected HH:MM[:SS])", raw)),
    };
    parsed.map_err(|_| format!("'{}' is not a valid time (expected HH:MM[:SS])", raw))
}
