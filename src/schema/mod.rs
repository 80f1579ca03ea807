//! Schema models and the flatten/rehydrate engine
//!
//! A [`ModelDef`] describes a tree of typed fields. [`flatten`] turns it into
//! one [`OptionDescriptor`] per leaf, each identified by a unique
//! [`NamespacedKey`]. [`rehydrate`] reverses the process: flat values are
//! regrouped into a [`Tree`] and validated into a domain object.

pub mod coerce;
pub mod flatten;
pub mod key;
pub mod rehydrate;
pub mod tree;
pub mod types;

// Re-export main types
pub use flatten::*;
pub use key::*;
pub use rehydrate::*;
pub use tree::*;
pub use types::*;
