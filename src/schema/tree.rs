//! Flat input and the reconstructed tree
//!
//! [`FlatInput`] holds one raw value per namespaced key, as collected from
//! the command line. [`Tree::from_flat`] regroups those entries into nested
//! mappings following each key's segments. Children are kept sorted, so the
//! resulting tree does not depend on entry order.

use crate::error::{ValidationError, ValidationResult};
use crate::schema::NamespacedKey;
use std::collections::BTreeMap;

/// Raw values keyed by namespaced key; `None` marks an absent value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatInput {
    entries: Vec<(NamespacedKey, Option<String>)>,
}

impl FlatInput {
    /// Create an empty mapping
    pub fn new() -> Self {
        FlatInput::default()
    }

    /// Add or replace the value for a key
    pub fn insert(&mut self, key: NamespacedKey, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value for a key; `None` if the key is missing or its value is absent
    pub fn get(&self, key: &NamespacedKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(NamespacedKey, Option<String>)> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(NamespacedKey, Option<String>)> for FlatInput {
    fn from_iter<I: IntoIterator<Item = (NamespacedKey, Option<String>)>>(iter: I) -> Self {
        let mut input = FlatInput::new();
        for (key, value) in iter {
            input.insert(key, value);
        }
        input
    }
}

/// A node of the reconstructed tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A leaf value; `None` when nothing was supplied
    Value(Option<String>),

    /// A nested mapping
    Tree(Tree),
}

/// Nested mapping from field name to value or subtree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    children: BTreeMap<String, Node>,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Tree::default()
    }

    /// Rebuild the nested structure from flat entries
    pub fn from_flat(input: &FlatInput) -> ValidationResult<Self> {
        let mut tree = Tree::new();
        for (key, value) in input.iter() {
            tree.insert(key, value.clone())?;
        }
        Ok(tree)
    }

    /// Insert a value at the path given by `key`, creating branches as needed
    pub fn insert(&mut self, key: &NamespacedKey, value: Option<String>) -> ValidationResult<()> {
        let (last, branches) = match key.segments().split_last() {
            Some(parts) => parts,
            None => {
                return Err(ValidationError::Invalid {
                    path: String::new(),
                    reason: "empty key".to_string(),
                })
            }
        };

        let mut current = self;
        let mut path = NamespacedKey::root();
        for segment in branches {
            path = path.child(segment);
            let node = current
                .children
                .entry(segment.clone())
                .or_insert_with(|| Node::Tree(Tree::new()));
            current = match node {
                Node::Tree(subtree) => subtree,
                Node::Value(_) => return Err(conflict(&path)),
            };
        }

        if let Some(Node::Tree(_)) = current.children.get(last) {
            return Err(conflict(key));
        }
        current.children.insert(last.clone(), Node::Value(value));
        Ok(())
    }

    /// Child node by field name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Leaf value by field name
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.children.get(name) {
            Some(Node::Value(value)) => value.as_deref(),
            _ => None,
        }
    }

    /// Subtree by field name
    pub fn subtree(&self, name: &str) -> Option<&Tree> {
        match self.children.get(name) {
            Some(Node::Tree(tree)) => Some(tree),
            _ => None,
        }
    }

    /// Field names present at this level, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Whether every leaf under this tree is absent
    pub fn is_vacant(&self) -> bool {
        self.children.values().all(|node| match node {
            Node::Value(value) => value.is_none(),
            Node::Tree(tree) => tree.is_vacant(),
        })
    }
}

fn conflict(key: &NamespacedKey) -> ValidationError {
    ValidationError::Invalid {
        path: key.to_string(),
        reason: "used both as a value and as a nested model".to_string(),
    }
}
