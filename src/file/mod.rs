//! File I/O for documents.
//!
//! Loads YAML or JSON documents from disk or stdin and saves them back with
//! atomic writes and optional backups. `.gz` files are handled transparently.

pub mod loader;
pub mod properties;
pub mod saver;

pub use loader::{load_document, load_from_stdin, DocumentFormat};
pub use properties::{parse_properties, Properties};
pub use saver::{save_document, to_json_string, to_yaml_string};
