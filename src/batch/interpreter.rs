//! Batch interpreter.
//!
//! Runs a script line by line, threading a pipeline value through the
//! statements. `foreach` bodies and nested `batch` scripts are run by
//! recursive calls that share the session (and so the memory store).

use super::error::{BatchErrorKind, BatchFileError};
use super::properties::{load_properties, PropertySets};
use super::script::{BatchScript, ScriptLine};
use super::statement::BatchStatement;
use crate::command::{execute_with_properties, reference, ReferenceError, Session, YamlCommand};
use crate::document::node::{YamlMap, YamlValue};
use crate::file::saver::to_yaml_string;
use crate::processor::macros::substitute_str;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loop index of the innermost `foreach`, starting at 0.
pub const FOREACH_INDEX: &str = "foreach.index";
/// Key of the current entry when looping over a mapping.
pub const FOREACH_KEY: &str = "foreach.iteration.key";
/// Memory name holding the current element.
pub const FOREACH_VALUE: &str = "foreach.iteration.value";

pub struct BatchInterpreter<'a> {
    session: &'a mut Session,
    out: &'a mut dyn Write,
    properties: PropertySets,
}

impl<'a> BatchInterpreter<'a> {
    pub fn new(session: &'a mut Session, out: &'a mut dyn Write) -> Self {
        Self {
            session,
            out,
            properties: PropertySets::new(),
        }
    }

    /// Starts with a copy of existing property sets.
    pub fn with_properties(mut self, properties: PropertySets) -> Self {
        self.properties = properties;
        self
    }

    /// Loads and runs a script file.
    pub fn run_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        input: YamlValue,
    ) -> Result<YamlValue, BatchFileError> {
        let path = path.as_ref();
        let script = BatchScript::load(path).map_err(|e| BatchFileError {
            file: path.display().to_string(),
            line: 0,
            text: String::new(),
            kind: BatchErrorKind::Io(format!("{:#}", e)),
        })?;
        info!(file = %path.display(), statements = script.len(), "running batch file");
        self.run_script(script, input)
    }

    /// Runs every remaining statement of `script`, returning the final
    /// pipeline value.
    pub fn run_script(
        &mut self,
        mut script: BatchScript,
        input: YamlValue,
    ) -> Result<YamlValue, BatchFileError> {
        let mut pipeline = input;

        while let Some(line) = script.next_line() {
            let statement = BatchStatement::parse(&line.content)
                .map_err(|kind| located(&script, &line, kind))?;
            debug!(file = script.source(), line = line.number, statement = ?statement, "executing");

            pipeline = match statement {
                BatchStatement::Foreach => {
                    let body = script
                        .take_block()
                        .ok_or_else(|| located(&script, &line, BatchErrorKind::UnmatchedForeach))?;
                    self.run_foreach(body, pipeline, &script, &line)?
                }
                BatchStatement::End => {
                    return Err(located(&script, &line, BatchErrorKind::UnexpectedEnd));
                }
                BatchStatement::SubBatch(path) => {
                    let path = self.expand(&path);
                    let path = resolve_script_path(&script, &path);
                    self.run_sub_batch(&path, pipeline)?
                }
                other => self
                    .execute_simple(other, pipeline)
                    .map_err(|kind| located(&script, &line, kind))?,
            };
        }

        Ok(pipeline)
    }

    /// Statements that neither open blocks nor recurse.
    fn execute_simple(
        &mut self,
        statement: BatchStatement,
        pipeline: YamlValue,
    ) -> Result<YamlValue, BatchErrorKind> {
        match statement {
            BatchStatement::Properties { name, reference } => {
                let reference = self.expand(&reference);
                let properties = load_properties(&reference, &self.session.memory)?;
                debug!(set = %name, count = properties.len(), "loaded properties");
                self.properties.insert_set(name, properties);
                Ok(pipeline)
            }
            BatchStatement::SetProperty { key, value } => {
                let value = self.expand(&value);
                self.properties.set(key, value);
                Ok(pipeline)
            }
            BatchStatement::Print(expr) => {
                let expr = self.expand(&expr);
                self.print(&expr, &pipeline)?;
                Ok(pipeline)
            }
            BatchStatement::SaveTo(target) => {
                let target = self.expand(&target);
                reference::save(&target, pipeline.clone(), self.session)?;
                Ok(pipeline)
            }
            BatchStatement::UseAsInput(source) => {
                let source = self.expand(&source);
                Ok(reference::recall(&source, &self.session.memory)?)
            }
            statement => {
                let line = statement.command_line().ok_or_else(|| {
                    BatchErrorKind::Malformed(format!("Unexpected statement {:?}", statement))
                })?;
                let line = self.expand(&line);
                let command = YamlCommand::parse_line(&line)?;
                Ok(execute_with_properties(
                    &command,
                    pipeline,
                    self.session,
                    &self.properties,
                )?)
            }
        }
    }

    fn run_foreach(
        &mut self,
        body: BatchScript,
        input: YamlValue,
        script: &BatchScript,
        line: &ScriptLine,
    ) -> Result<YamlValue, BatchFileError> {
        let iterations = foreach_items(input).map_err(|kind| located(script, line, kind))?;
        debug!(line = line.number, iterations = iterations.len(), "foreach");

        let saved_index = self.properties.get(FOREACH_INDEX).map(str::to_string);
        let saved_key = self.properties.get(FOREACH_KEY).map(str::to_string);
        let saved_value = self.session.memory.recall(FOREACH_VALUE).cloned();

        let mut results = Vec::with_capacity(iterations.len());
        for (index, item) in iterations.into_iter().enumerate() {
            self.properties.set(FOREACH_INDEX, index.to_string());
            if let Some(key) = &item.key {
                self.properties.set(FOREACH_KEY, key.clone());
            }
            self.session.memory.save(FOREACH_VALUE, item.value);

            let mut iteration = body.clone();
            iteration.rewind();
            results.push(self.run_script(iteration, item.input)?);
        }

        self.properties.restore(FOREACH_INDEX, saved_index);
        self.properties.restore(FOREACH_KEY, saved_key);
        match saved_value {
            Some(value) => {
                self.session.memory.save(FOREACH_VALUE, value);
            }
            None => {
                self.session.memory.remove(FOREACH_VALUE);
            }
        }

        Ok(YamlValue::Array(results))
    }

    fn run_sub_batch(&mut self, path: &Path, input: YamlValue) -> Result<YamlValue, BatchFileError> {
        let mut nested = BatchInterpreter::new(&mut *self.session, &mut *self.out)
            .with_properties(self.properties.clone());
        nested.run_file(path, input)
    }

    fn print(&mut self, expr: &str, pipeline: &YamlValue) -> Result<(), BatchErrorKind> {
        let (expr, newline) = match expr.strip_suffix("\\n") {
            Some(stripped) => (stripped, true),
            None => (expr, false),
        };

        let text = if expr == "-" {
            render(pipeline)?
        } else if let Some(name) = expr.strip_prefix('!') {
            let value = self.session.memory.recall(name).ok_or_else(|| {
                ReferenceError::MissingMemory {
                    name: name.to_string(),
                }
            })?;
            render(value)?
        } else {
            expr.to_string()
        };

        let written = if newline {
            writeln!(self.out, "{}", text)
        } else {
            write!(self.out, "{}", text)
        };
        written.map_err(|e| BatchErrorKind::Io(e.to_string()))
    }

    fn expand(&self, text: &str) -> String {
        substitute_str(text, &self.properties, &self.session.config.macro_namespace).0
    }
}

/// One `foreach` iteration: the element, its key for mappings, and the
/// pipeline value the body starts with.
struct Iteration {
    key: Option<String>,
    value: YamlValue,
    input: YamlValue,
}

fn foreach_items(input: YamlValue) -> Result<Vec<Iteration>, BatchErrorKind> {
    match input {
        YamlValue::Array(items) if items.iter().all(|v| v.is_scalar() || v.is_object()) => Ok(items
            .into_iter()
            .map(|value| Iteration {
                key: None,
                input: value.clone(),
                value,
            })
            .collect()),
        YamlValue::Object(map) if map.values().all(YamlValue::is_scalar) => Ok(map
            .into_iter()
            .map(|(key, value)| {
                let mut entry = YamlMap::new();
                entry.insert(key.clone(), value.clone());
                Iteration {
                    key: Some(key),
                    value,
                    input: YamlValue::Object(entry),
                }
            })
            .collect()),
        YamlValue::Array(_) => Err(BatchErrorKind::ForeachShape {
            found: "a sequence containing sequences".to_string(),
        }),
        YamlValue::Object(_) => Err(BatchErrorKind::ForeachShape {
            found: "a mapping with nested values".to_string(),
        }),
        other => Err(BatchErrorKind::ForeachShape {
            found: other.type_name().to_string(),
        }),
    }
}

/// Scalars print as text, containers as YAML without the trailing newline.
fn render(value: &YamlValue) -> Result<String, BatchErrorKind> {
    match value.scalar_text() {
        Some(text) => Ok(text),
        None => to_yaml_string(value)
            .map(|yaml| yaml.trim_end().to_string())
            .map_err(|e| BatchErrorKind::Io(format!("{:#}", e))),
    }
}

/// Relative paths are taken from the calling script's directory when the
/// file exists there.
fn resolve_script_path(script: &BatchScript, path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        return candidate;
    }
    match script.base_dir().map(|dir| dir.join(&candidate)) {
        Some(beside) if beside.exists() => beside,
        _ => candidate,
    }
}

fn located(script: &BatchScript, line: &ScriptLine, kind: BatchErrorKind) -> BatchFileError {
    BatchFileError {
        file: script.source().to_string(),
        line: line.number,
        text: line.text.clone(),
        kind,
    }
}
