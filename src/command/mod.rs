//! Command dispatch.
//!
//! [`YamlCommand`] is the grammar shared by the `yamlpipe` binary and by the
//! generic command lines of a batch script. [`execute`] runs one command
//! against an input document inside a [`Session`].

pub mod error;
pub mod memory;
pub mod reference;

pub use error::{CommandError, ReferenceError};
pub use memory::MemoryStore;

use crate::config::Config;
use crate::document::node::YamlValue;
use crate::file::properties::Properties;
use crate::processor::macros::{self, PropertyLookup};
use crate::processor::{
    DeleteProcessor, EntryProcessor, InsertProcessor, ListProcessor, ReadProcessor,
    ReplaceProcessor, TableProcessor,
};
use crate::yamlpath::{Matcher, YamlPath};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

/// Context of one top-level invocation.
///
/// Nested batch scripts share the same session, so memory written by one
/// is visible to the next.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub config: Config,
    pub memory: MemoryStore,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            memory: MemoryStore::new(),
        }
    }
}

/// A YAML-path plus an optional delimiter override.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PathArgs {
    /// YAML-path, e.g. `paths.*.get.responses`
    pub path: String,

    /// Segment delimiter (default from config, usually ".")
    #[arg(short = 'd', long)]
    pub delimiter: Option<String>,
}

impl PathArgs {
    fn compile(&self, config: &Config) -> Result<YamlPath, CommandError> {
        let delimiter = self.delimiter.as_deref().unwrap_or(&config.delimiter);
        Ok(YamlPath::parse(&self.path, delimiter)?)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum YamlCommand {
    /// Print the values at every matching path
    Read {
        #[command(flatten)]
        target: PathArgs,
    },
    /// Print every matching path
    List {
        #[command(flatten)]
        target: PathArgs,
    },
    /// Print the named fields of every match as table rows
    Table {
        #[command(flatten)]
        target: PathArgs,
        /// Field names, separated by the delimiter
        fields: String,
    },
    /// Remove every matching key
    Delete {
        #[command(flatten)]
        target: PathArgs,
    },
    /// Set data at every matching path, creating missing paths
    Insert {
        #[command(flatten)]
        target: PathArgs,
        /// Inline JSON/YAML, @file or !memory
        data: String,
    },
    /// Overwrite the value at every matching path
    Replace {
        #[command(flatten)]
        target: PathArgs,
        /// Inline JSON/YAML, @file or !memory
        data: String,
    },
    /// Substitute ${namespace::name} tokens from a property set
    Macro {
        /// @file.properties, or inline JSON/YAML, @file or !memory holding a mapping
        properties: String,
    },
}

/// Wrapper used to parse one batch line against the [`YamlCommand`] grammar.
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_help_flag = true
)]
struct CommandLine {
    #[command(subcommand)]
    cmd: YamlCommand,
}

impl YamlCommand {
    /// Parses a command line using shell quoting rules.
    pub fn parse_line(line: &str) -> Result<Self, CommandError> {
        let tokens = shell_words::split(line)
            .map_err(|e| CommandError::Usage(format!("Cannot tokenize '{}': {}", line, e)))?;
        if tokens.is_empty() {
            return Err(CommandError::Usage("Empty command".to_string()));
        }

        CommandLine::try_parse_from(&tokens)
            .map(|parsed| parsed.cmd)
            .map_err(|e| CommandError::Usage(e.to_string().trim_end().to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            YamlCommand::Read { .. } => "read",
            YamlCommand::List { .. } => "list",
            YamlCommand::Table { .. } => "table",
            YamlCommand::Delete { .. } => "delete",
            YamlCommand::Insert { .. } => "insert",
            YamlCommand::Replace { .. } => "replace",
            YamlCommand::Macro { .. } => "macro",
        }
    }
}

/// Runs `command` against `input`.
///
/// Read, list and table return a new sequence; delete, insert and replace
/// return the mutated input; macro returns the substituted copy.
pub fn execute(
    command: &YamlCommand,
    input: YamlValue,
    session: &mut Session,
) -> Result<YamlValue, CommandError> {
    execute_with_properties(command, input, session, &Properties::new())
}

/// Like [`execute`], but `macro` falls back to `inherited` for names its own
/// property set does not define.
pub fn execute_with_properties(
    command: &YamlCommand,
    mut input: YamlValue,
    session: &mut Session,
    inherited: &dyn PropertyLookup,
) -> Result<YamlValue, CommandError> {
    debug!(command = command.name(), "executing");
    let config = &session.config;

    match command {
        YamlCommand::Read { target } => {
            let mut reader = ReadProcessor::new();
            run_matcher(&mut reader, &mut input, &target.compile(config)?, config)?;
            Ok(YamlValue::Array(reader.into_values()))
        }
        YamlCommand::List { target } => {
            let mut lister = ListProcessor::new();
            run_matcher(&mut lister, &mut input, &target.compile(config)?, config)?;
            Ok(YamlValue::Array(
                lister.into_paths().into_iter().map(YamlValue::String).collect(),
            ))
        }
        YamlCommand::Table { target, fields } => {
            let pattern = target.compile(config)?;
            let mut table = TableProcessor::new(
                fields
                    .split(pattern.delimiter())
                    .map(str::trim)
                    .filter(|f| !f.is_empty()),
            );
            run_matcher(&mut table, &mut input, &pattern, config)?;
            Ok(YamlValue::Array(
                table.into_rows().into_iter().map(YamlValue::Array).collect(),
            ))
        }
        YamlCommand::Delete { target } => {
            let mut deleter = DeleteProcessor::new();
            run_matcher(&mut deleter, &mut input, &target.compile(config)?, config)?;
            debug!(deleted = deleter.deleted(), "delete finished");
            Ok(input)
        }
        YamlCommand::Insert { target, data } => {
            let pattern = target.compile(config)?;
            let new_data = reference::resolve(data, &session.memory)?;
            if input.is_null() {
                input = YamlValue::empty_object();
            }
            let mut inserter = InsertProcessor::new(new_data);
            run_matcher(&mut inserter, &mut input, &pattern, config)?;
            debug!(
                replaced = inserter.replaced(),
                created = inserter.created(),
                "insert finished"
            );
            Ok(input)
        }
        YamlCommand::Replace { target, data } => {
            let pattern = target.compile(config)?;
            let replacement = reference::resolve(data, &session.memory)?;
            let mut replacer = ReplaceProcessor::new(replacement);
            run_matcher(&mut replacer, &mut input, &pattern, config)?;
            debug!(replaced = replacer.replaced(), "replace finished");
            Ok(input)
        }
        YamlCommand::Macro { properties } => {
            let props = reference::resolve_properties(properties, &session.memory)?;
            let lookup: [&dyn PropertyLookup; 2] = [&props, inherited];
            let (output, changed) =
                macros::substitute(&input, &lookup[..], &config.macro_namespace);
            debug!(changed, "macro finished");
            Ok(output)
        }
    }
}

fn run_matcher<P: EntryProcessor>(
    processor: &mut P,
    doc: &mut YamlValue,
    pattern: &YamlPath,
    config: &Config,
) -> Result<bool, CommandError> {
    Ok(Matcher::new(processor)
        .strict_sequences(config.strict_sequences)
        .run(doc, pattern)?)
}
