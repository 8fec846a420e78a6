//! YAML-path patterns and the matcher that walks documents with them.
//!
//! A YAML-path is a delimiter-separated list of segments. Each segment is a
//! regular expression that must match a whole mapping key; a bare `*` matches
//! any single key.
//!
//! # Examples
//!
//! ```text
//! paths.*.*.responses.200.description   every 200-response description
//! paths./pet.*                          every operation under /pet
//! paths./pet.get|put                    only the get and put operations
//! ```
//!
//! Sequences are transparent: when a matched value is a sequence, each of its
//! mapping elements is matched against the remaining segments.

pub mod ast;
pub mod error;
pub mod matcher;
pub mod parser;

pub use ast::{PathSegment, YamlPath};
pub use error::YamlPathError;
pub use matcher::Matcher;
pub use parser::{Parser, DEFAULT_DELIMITER};
