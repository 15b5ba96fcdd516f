//! Scoped configuration trees.
//!
//! Classifies configuration fields, merges contributions with per-field
//! semantics and walks FQN paths through nested configuration trees.

mod error;
mod fields;
mod lookup;
mod policy;

pub use error::CompilerError;
pub use fields::{
    ConfigMap, FieldKind, FieldPolicy, APPEND_FIELDS, CLOBBER_FIELDS, DICT_UNION_FIELDS,
};
pub use lookup::{lookup, TreeLookup};
pub use policy::as_list;
