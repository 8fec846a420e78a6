//! yamlpipe: query and rewrite YAML documents with YAML-paths, and script
//! those operations with batch files.
//!
//! # Example
//!
//! ```
//! use yamlpipe::command::{execute, Session, YamlCommand};
//! use yamlpipe::document::parser::parse_yaml;
//!
//! let doc = parse_yaml("paths:\n  /pet:\n    get: {}\n").unwrap();
//! let command = YamlCommand::parse_line("list paths.*.*").unwrap();
//! let listed = execute(&command, doc, &mut Session::default()).unwrap();
//! assert_eq!(listed, parse_yaml("['paths./pet.get']").unwrap());
//! ```

pub mod batch;
pub mod command;
pub mod config;
pub mod document;
pub mod file;
pub mod processor;
pub mod yamlpath;
