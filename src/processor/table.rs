//! Table: pull a fixed list of fields out of every end-to-end match.
//!
//! A matched mapping yields one row; a matched sequence yields one row per
//! mapping element. Every row has exactly one cell per requested field.

use super::{EntryProcessor, MatchSite, ProcessorError, TableError};
use crate::document::node::{YamlMap, YamlValue};

#[derive(Debug)]
pub struct TableProcessor {
    fields: Vec<String>,
    rows: Vec<Vec<YamlValue>>,
}

impl TableProcessor {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn rows(&self) -> &[Vec<YamlValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<YamlValue>> {
        self.rows
    }

    fn row_from(&self, map: &YamlMap, path: &str) -> Result<Vec<YamlValue>, TableError> {
        self.fields
            .iter()
            .map(|field| {
                map.get(field).cloned().ok_or_else(|| TableError::MissingField {
                    field: field.clone(),
                    path: path.to_string(),
                })
            })
            .collect()
    }
}

impl EntryProcessor for TableProcessor {
    fn on_end2end_match(&mut self, site: &MatchSite<'_>) -> Result<(), ProcessorError> {
        let path = site.trail.join(site.pattern.delimiter());

        match site.value {
            YamlValue::Object(map) if !map.is_empty() => {
                let row = self.row_from(map, &path)?;
                self.rows.push(row);
            }
            YamlValue::Array(items) => {
                let mut found = false;
                for map in items.iter().filter_map(YamlValue::as_object) {
                    let row = self.row_from(map, &path)?;
                    self.rows.push(row);
                    found = true;
                }
                if !found {
                    return Err(TableError::NoSubElements { path }.into());
                }
            }
            _ => return Err(TableError::NoSubElements { path }.into()),
        }
        Ok(())
    }
}

/// Renders rows as left-aligned, space-padded columns.
pub fn format_table(rows: &[Vec<YamlValue>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            cells
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in &cells {
        let line = row
            .iter()
            .enumerate()
            .map(|(col, cell)| format!("{:<width$}", cell, width = widths[col]))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
