//! The in-memory document model.
//!
//! - [`node`]: the `YamlValue` tree
//! - [`parser`]: YAML/JSON text into `YamlValue`
//! - [`tree`]: `NodePath` addressing for deferred mutation

pub mod node;
pub mod parser;
pub mod tree;

pub use node::{YamlMap, YamlNumber, YamlValue};
pub use tree::{NodePath, PathStep};
