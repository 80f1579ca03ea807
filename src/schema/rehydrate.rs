//! Rehydration: flat input back to a validated domain object
//!
//! The flat entries are regrouped into a [`Tree`], the tree is checked and
//! coerced against the model (nested models first), the typed result is
//! deserialized into the domain type and finally `Schema::check` applies
//! whole-object rules.

use crate::error::{Result, ValidationError};
use crate::schema::coerce::coerce;
use crate::schema::flatten::check_field_names;
use crate::schema::{FlatInput, ModelDef, NamespacedKey, Node, Resolved, Schema, Tree};
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Rebuild and validate a `S` from flat command-line values
pub fn rehydrate<S: Schema>(input: &FlatInput) -> Result<S> {
    let tree = Tree::from_flat(input)?;
    instantiate(&tree)
}

/// Validate a reconstructed tree and build a `S` from it
pub fn instantiate<S: Schema>(tree: &Tree) -> Result<S> {
    let model = S::model();
    let root = NamespacedKey::root();
    let value = coerce_model(&model, tree, &root)?;

    let object: S = serde_yaml::from_value(Value::Mapping(value)).map_err(|e| {
        ValidationError::Model {
            path: String::new(),
            reason: e.to_string(),
        }
    })?;
    object.check(&root)?;

    debug!(model = %model.name, "rehydrated domain object");
    Ok(object)
}

/// Coerce every field of `model` found in `tree` into a typed mapping
fn coerce_model(model: &ModelDef, tree: &Tree, path: &NamespacedKey) -> Result<Mapping> {
    check_field_names(model)?;

    for name in tree.names() {
        if model.get(name).is_none() {
            return Err(ValidationError::Invalid {
                path: path.child(name).to_string(),
                reason: format!("unknown field for {}", model.name),
            }
            .into());
        }
    }

    let mut mapping = Mapping::new();
    for field in &model.fields {
        let key = path.child(&field.name);
        let value = match field.ty.resolve(&key.to_string())? {
            Resolved::Leaf(kind) => match tree.get(&field.name) {
                Some(Node::Value(Some(raw))) => coerce(kind, raw).map_err(|reason| {
                    ValidationError::Invalid {
                        path: key.to_string(),
                        reason,
                    }
                })?,
                Some(Node::Tree(_)) => {
                    return Err(ValidationError::Invalid {
                        path: key.to_string(),
                        reason: "expected a value, found a nested model".to_string(),
                    }
                    .into())
                }
                Some(Node::Value(None)) | None => {
                    if field.required {
                        return Err(ValidationError::Missing {
                            path: key.to_string(),
                        }
                        .into());
                    }
                    Value::Null
                }
            },
            Resolved::Nested(child) => match tree.get(&field.name) {
                Some(Node::Tree(subtree)) if field.required || !subtree.is_vacant() => {
                    Value::Mapping(coerce_model(child, subtree, &key)?)
                }
                Some(Node::Value(Some(_))) => {
                    return Err(ValidationError::Invalid {
                        path: key.to_string(),
                        reason: format!("expected fields of {}, found a value", child.name),
                    }
                    .into())
                }
                _ if field.required => {
                    return Err(ValidationError::Missing {
                        path: key.to_string(),
                    }
                    .into())
                }
                _ => Value::Null,
            },
        };
        mapping.insert(Value::String(field.name.clone()), value);
    }

    Ok(mapping)
}
