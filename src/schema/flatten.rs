//! Schema flattening
//!
//! Walks a model depth-first in declaration order and emits one
//! [`OptionDescriptor`] per leaf field.

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{is_valid_identifier, LeafKind, ModelDef, NamespacedKey, Resolved};
use std::collections::HashSet;
use tracing::debug;

/// One command-line option generated from a leaf field
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
    /// Visible flag name, without the leading `--`
    pub flag: String,

    /// Unique path of the leaf from the root model
    pub key: NamespacedKey,

    /// Default value, already resolved
    pub default: Option<String>,

    /// Whether the default came from a generator (hidden in help)
    pub default_generated: bool,

    /// Whether the option must be supplied
    pub required: bool,

    /// Help text
    pub description: Option<String>,

    /// Leaf kind, used for help hints
    pub kind: LeafKind,
}

/// Visible flag name for a field: underscores become hyphens
pub fn flag_name(field_name: &str) -> String {
    field_name.replace('_', "-")
}

/// Flatten `model` into option descriptors
///
/// `prefix` is the key of the model itself; pass [`NamespacedKey::root`] for
/// the root call. Default generators are invoked here, once per call.
pub fn flatten(model: &ModelDef, prefix: &NamespacedKey) -> SchemaResult<Vec<OptionDescriptor>> {
    let mut descriptors = Vec::new();
    flatten_into(model, prefix, true, &mut descriptors)?;
    debug!(
        model = %model.name,
        options = descriptors.len(),
        "flattened schema model"
    );
    Ok(descriptors)
}

fn flatten_into(
    model: &ModelDef,
    prefix: &NamespacedKey,
    parent_required: bool,
    out: &mut Vec<OptionDescriptor>,
) -> SchemaResult<()> {
    check_field_names(model)?;

    for field in &model.fields {
        let key = prefix.child(&field.name);
        match field.ty.resolve(&key.to_string())? {
            Resolved::Nested(child) => {
                // A required leaf inside an optional model cannot be required on the command line
                flatten_into(child, &key, parent_required && field.required, out)?;
            }
            Resolved::Leaf(kind) => out.push(OptionDescriptor {
                flag: flag_name(&field.name),
                key,
                default: field.default.resolve(),
                default_generated: field.default.is_generated(),
                required: parent_required && field.required,
                description: field.description.clone(),
                kind: kind.clone(),
            }),
        }
    }

    Ok(())
}

/// Reject invalid or repeated field names within one model
pub(crate) fn check_field_names(model: &ModelDef) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for field in &model.fields {
        if !is_valid_identifier(&field.name) {
            return Err(SchemaError::InvalidFieldName {
                model: model.name.clone(),
                name: field.name.clone(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                model: model.name.clone(),
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}
