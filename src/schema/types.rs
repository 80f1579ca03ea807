//! Schema model types
//!
//! A [`ModelDef`] is an ordered list of [`FieldDef`]s. Each field is either a
//! leaf holding a primitive value or a nested model, possibly wrapped in an
//! optional or union annotation. [`FieldType::resolve`] sees through those
//! wrappers so the flattener and rehydrator only deal with two cases.

use crate::error::{SchemaError, SchemaResult, ValidationResult};
use crate::schema::NamespacedKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// A named, ordered set of field definitions
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    /// Model name, used in error messages
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<FieldDef>,
}

impl ModelDef {
    /// Create an empty model
    pub fn new(name: impl Into<String>) -> Self {
        ModelDef {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single field of a model
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field identifier (lowercase letters, digits and '_')
    pub name: String,

    /// Declared value type
    pub ty: FieldType,

    /// Whether a value must be supplied
    pub required: bool,

    /// Default used when the field is not supplied
    pub default: DefaultValue,

    /// Help text
    pub description: Option<String>,
}

impl FieldDef {
    /// Create an optional field of the given type with no default
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            required: false,
            default: DefaultValue::None,
            description: None,
        }
    }

    /// Create a leaf field
    pub fn leaf(name: impl Into<String>, kind: LeafKind) -> Self {
        Self::new(name, FieldType::Leaf(kind))
    }

    /// Create a nested-model field
    pub fn nested(name: impl Into<String>, model: ModelDef) -> Self {
        Self::new(name, FieldType::Model(model))
    }

    /// Mark the field as required (clears any default)
    pub fn required(mut self) -> Self {
        self.required = true;
        self.default = DefaultValue::None;
        self
    }

    /// Set a static default
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.required = false;
        self.default = DefaultValue::Static(value.into());
        self
    }

    /// Set a default generator, invoked once per flatten
    pub fn default_with(mut self, generator: fn() -> String) -> Self {
        self.required = false;
        self.default = DefaultValue::Generator(generator);
        self
    }

    /// Set the help text
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declared type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// A primitive or enumerated value
    Leaf(LeafKind),

    /// A nested model, composed into the parent
    Model(ModelDef),

    /// A nullable wrapper around another type
    Optional(Box<FieldType>),

    /// Any one of several types
    Union(Vec<FieldType>),

    /// A sequence of values (not representable as a single option)
    List(Box<FieldType>),
}

/// What a field type resolves to once wrappers are stripped
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Leaf(&'a LeafKind),
    Nested(&'a ModelDef),
}

impl FieldType {
    /// Wrap this type in an optional annotation
    pub fn optional(self) -> Self {
        FieldType::Optional(Box::new(self))
    }

    /// Resolve to a leaf kind or a nested model, seeing through wrappers
    ///
    /// A union resolves only when every member resolves to the same kind.
    pub fn resolve(&self, field: &str) -> SchemaResult<Resolved<'_>> {
        match self {
            FieldType::Leaf(kind) => Ok(Resolved::Leaf(kind)),
            FieldType::Model(model) => Ok(Resolved::Nested(model)),
            FieldType::Optional(inner) => inner.resolve(field),
            FieldType::Union(members) => {
                let mut resolved = members.iter().map(|m| m.resolve(field));
                let first = match resolved.next() {
                    Some(first) => first?,
                    None => {
                        return Err(SchemaError::UnsupportedType {
                            field: field.to_string(),
                            kind: "empty union".to_string(),
                        })
                    }
                };
                for other in resolved {
                    if other? != first {
                        return Err(SchemaError::IncompatibleUnion {
                            field: field.to_string(),
                        });
                    }
                }
                Ok(first)
            }
            FieldType::List(_) => Err(SchemaError::UnsupportedType {
                field: field.to_string(),
                kind: "list".to_string(),
            }),
        }
    }
}

/// Primitive value kinds a leaf may hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    /// Free text with optional length bounds
    Str {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },

    /// Base-10 integer with optional inclusive bounds
    Int { min: Option<i64>, max: Option<i64> },

    /// Boolean
    Bool,

    /// Filesystem path
    Path,

    /// Wall-clock duration written as `H:M[:S]`
    Time,

    /// One of a fixed set of lowercase names, matched case-insensitively
    Choice(&'static [&'static str]),
}

impl LeafKind {
    /// Unbounded string
    pub fn string() -> Self {
        LeafKind::Str {
            min_len: None,
            max_len: None,
        }
    }

    /// Integer greater than zero that fits a `u32`
    pub fn positive_int() -> Self {
        LeafKind::Int {
            min: Some(1),
            max: Some(u32::MAX as i64),
        }
    }

    /// Integer greater than zero, up to `i64::MAX`
    pub fn positive_long() -> Self {
        LeafKind::Int {
            min: Some(1),
            max: None,
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafKind::Str { .. } => write!(f, "string"),
            LeafKind::Int { .. } => write!(f, "integer"),
            LeafKind::Bool => write!(f, "boolean"),
            LeafKind::Path => write!(f, "path"),
            LeafKind::Time => write!(f, "time"),
            LeafKind::Choice(choices) => write!(f, "one of {}", choices.join(", ")),
        }
    }
}

/// Default for a field that was not supplied
#[derive(Clone, PartialEq)]
pub enum DefaultValue {
    /// No default; the field is absent (or required)
    None,

    /// A fixed value
    Static(String),

    /// A value computed on demand
    Generator(fn() -> String),
}

impl DefaultValue {
    /// Produce the default, invoking the generator if there is one
    pub fn resolve(&self) -> Option<String> {
        match self {
            DefaultValue::None => None,
            DefaultValue::Static(value) => Some(value.clone()),
            DefaultValue::Generator(generator) => Some(generator()),
        }
    }

    /// Whether the default is computed on demand
    pub fn is_generated(&self) -> bool {
        matches!(self, DefaultValue::Generator(_))
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::None => write!(f, "None"),
            DefaultValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
            DefaultValue::Generator(_) => write!(f, "Generator(..)"),
        }
    }
}

/// A domain type that can be generated from, and validated against, a model
///
/// `model()` drives both the CLI surface and coercion; deserialization builds
/// the typed value and `check()` applies whole-object rules afterwards.
pub trait Schema: DeserializeOwned + Serialize {
    /// The model definition describing this type's fields
    fn model() -> ModelDef;

    /// Whole-object validation, run after every field has been coerced
    ///
    /// Implementations validate nested domain objects first.
    fn check(&self, _path: &NamespacedKey) -> ValidationResult<()> {
        Ok(())
    }
}
