//! Namespaced keys
//!
//! A key is the path of field names from the root model to one leaf. It is
//! kept as a list of segments; the string form joins them with `.`, a
//! character field identifiers may not contain.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Separator used by the string form of a key
pub const KEY_SEPARATOR: char = '.';

/// Whether `name` is a valid field identifier
pub fn is_valid_identifier(name: &str) -> bool {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT
        .get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("identifier pattern is valid"))
        .is_match(name)
}

/// Path from the root model to a field
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NamespacedKey {
    segments: Vec<String>,
}

impl NamespacedKey {
    /// The empty path (the root model itself)
    pub fn root() -> Self {
        NamespacedKey::default()
    }

    /// Build a key from its segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NamespacedKey {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Extend this path by one field name
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        NamespacedKey { segments }
    }

    /// Path segments, root first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The local field name (last segment)
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", KEY_SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Error returned when a key string contains an invalid segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(pub String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid key segment '{}'", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for NamespacedKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(NamespacedKey::root());
        }
        let mut segments = Vec::new();
        for segment in s.split(KEY_SEPARATOR) {
            if !is_valid_identifier(segment) {
                return Err(ParseKeyError(segment.to_string()));
            }
            segments.push(segment.to_string());
        }
        Ok(NamespacedKey { segments })
    }
}
