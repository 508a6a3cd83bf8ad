//! CSV output format.
//!
//! Column order is taken from the first row seen (header or first chunk) and
//! held for the rest of the run, so every page renders the same columns in
//! the same order even if later rows carry keys in a different order.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::domain::entities::Row;
use crate::domain::errors::{ExportError, Result};
use crate::ports::serializer::Serializer;

/// Options recognized by the CSV format.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CsvOptions {
    /// Field delimiter. Must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Emit a column-name header line.
    #[serde(default = "default_true")]
    pub include_header: bool,
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }
}

pub struct CsvSerializer {
    options: CsvOptions,
    columns: OnceLock<Vec<String>>,
}

impl CsvSerializer {
    pub fn new(options: CsvOptions) -> Self {
        Self {
            options,
            columns: OnceLock::new(),
        }
    }

    fn column_names(row: &Row) -> Vec<String> {
        row.as_object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Renders `records` through the csv crate and strips the final line
    /// terminator; the sink appends its own.
    fn write_records(&self, records: impl IntoIterator<Item = Vec<String>>) -> Result<String> {
        let mut wtr = ::csv::WriterBuilder::new()
            .delimiter(self.options.delimiter as u8)
            .has_headers(false)
            .from_writer(Vec::new());
        for record in records {
            wtr.write_record(&record)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ExportError::Serialize(e.to_string()))?;
        let mut out = String::from_utf8(bytes)
            .map_err(|e| ExportError::Serialize(e.to_string()))?;
        if out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    fn field(value: Option<&serde_json::Value>) -> Result<String> {
        Ok(match value {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::Bool(b)) => b.to_string(),
            // Nested arrays/objects are embedded as their JSON text.
            Some(other) => serde_json::to_string(other)?,
        })
    }
}

impl Serializer for CsvSerializer {
    fn render_header(&self, first_row: Option<&Row>) -> Result<Option<String>> {
        let Some(row) = first_row else {
            return Ok(None);
        };
        let columns = self
            .columns
            .get_or_init(|| Self::column_names(row))
            .clone();
        if !self.options.include_header || columns.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.write_records([columns])?))
    }

    fn render_footer(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn render_chunk(&self, rows: &[Row]) -> Result<String> {
        let Some(first) = rows.first() else {
            return Ok(String::new());
        };
        let columns = self.columns.get_or_init(|| Self::column_names(first));
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut record = Vec::with_capacity(columns.len());
            for col in columns {
                record.push(Self::field(row.get(col))?);
            }
            records.push(record);
        }
        self.write_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lists_columns_from_first_row() {
        let s = CsvSerializer::new(CsvOptions::default());
        let header = s
            .render_header(Some(&json!({"id": 1, "name": "ada"})))
            .unwrap();
        assert_eq!(header, Some("id,name".to_string()));
    }

    #[test]
    fn header_suppressed_when_disabled_or_source_empty() {
        let s = CsvSerializer::new(CsvOptions {
            include_header: false,
            ..CsvOptions::default()
        });
        assert_eq!(s.render_header(Some(&json!({"id": 1}))).unwrap(), None);

        let s = CsvSerializer::new(CsvOptions::default());
        assert_eq!(s.render_header(None).unwrap(), None);
    }

    #[test]
    fn chunk_follows_header_column_order() {
        let s = CsvSerializer::new(CsvOptions::default());
        s.render_header(Some(&json!({"id": 1, "name": "ada"})))
            .unwrap();
        // Second row carries its keys in a different order.
        let chunk = s
            .render_chunk(&[
                json!({"id": 1, "name": "ada"}),
                json!({"name": "grace", "id": 2}),
            ])
            .unwrap();
        assert_eq!(chunk, "1,ada\n2,grace");
    }

    #[test]
    fn fields_are_quoted_and_nulls_empty() {
        let s = CsvSerializer::new(CsvOptions::default());
        let chunk = s
            .render_chunk(&[json!({"a": "x,y", "b": null})])
            .unwrap();
        assert_eq!(chunk, "\"x,y\",");
    }

    #[test]
    fn custom_delimiter() {
        let s = CsvSerializer::new(CsvOptions {
            delimiter: ';',
            include_header: true,
        });
        let chunk = s.render_chunk(&[json!({"a": 1, "b": 2})]).unwrap();
        assert_eq!(chunk, "1;2");
    }

    #[test]
    fn no_footer() {
        let s = CsvSerializer::new(CsvOptions::default());
        assert_eq!(s.render_footer().unwrap(), None);
    }
}
