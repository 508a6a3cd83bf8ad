//! CSV-file implementation of the `PageFetcher` port.
//!
//! Treats a headered CSV file as a single queryable table. Each call
//! re-scans the file, applies the filter predicates, and returns the
//! requested window plus the total matching row count, so the source behaves
//! like a stateless query engine: offsets past the end yield an empty page
//! with the known total, never an error.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::domain::entities::{FilterOp, Page, Row, TableFilter};
use crate::domain::errors::{ExportError, Result};
use crate::ports::page_fetcher::PageFetcher;

pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Infers a JSON value from a raw CSV field: integers, floats and
    /// booleans become typed values, everything else stays a string.
    fn infer_value(field: &str) -> Value {
        if let Ok(i) = field.parse::<i64>() {
            return Value::from(i);
        }
        if let Ok(f) = field.parse::<f64>() {
            if field.chars().any(|c| c == '.' || c == 'e' || c == 'E') {
                return Value::from(f);
            }
        }
        match field {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(field.to_string()),
        }
    }

    fn matches(row: &Row, filter: &TableFilter) -> bool {
        let cell = row.get(&filter.field).unwrap_or(&Value::Null);
        match filter.op {
            FilterOp::Eq => cell == &filter.value,
            FilterOp::Ne => cell != &filter.value,
            FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
                Self::ordered(cell, &filter.value, filter.op)
            }
            FilterOp::Like => Self::like(cell, &filter.value),
        }
    }

    fn ordered(cell: &Value, wanted: &Value, op: FilterOp) -> bool {
        // Numeric comparison when both sides are numbers, lexicographic
        // otherwise.
        let cmp = match (cell.as_f64(), wanted.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => Some(Self::text(cell).cmp(&Self::text(wanted))),
        };
        let Some(cmp) = cmp else {
            return false;
        };
        match op {
            FilterOp::Gt => cmp.is_gt(),
            FilterOp::Gte => cmp.is_ge(),
            FilterOp::Lt => cmp.is_lt(),
            FilterOp::Lte => cmp.is_le(),
            _ => false,
        }
    }

    fn like(cell: &Value, pattern: &Value) -> bool {
        let cell = Self::text(cell).to_lowercase();
        let pattern = Self::text(pattern).to_lowercase();
        match (pattern.strip_prefix('%'), pattern.strip_suffix('%')) {
            (Some(rest), _) if rest.ends_with('%') => {
                cell.contains(rest.trim_end_matches('%'))
            }
            (Some(suffix), None) => cell.ends_with(suffix),
            (None, Some(prefix)) => cell.starts_with(prefix),
            _ => cell == pattern,
        }
    }

    fn text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl PageFetcher for CsvFileSource {
    fn select_top(
        &self,
        _table: &str,
        offset: u64,
        limit: u64,
        _order_by: &[String],
        filters: &[TableFilter],
        _schema: Option<&str>,
    ) -> Result<Option<Page>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| ExportError::Fetch(e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| ExportError::Fetch(e.to_string()))?
            .clone();

        let mut rows: Vec<Row> = Vec::new();
        let mut total_matches: u64 = 0;

        for record in reader.records() {
            let record = record.map_err(|e| ExportError::Fetch(e.to_string()))?;
            let mut object = Map::new();
            for (header, field) in headers.iter().zip(record.iter()) {
                object.insert(header.to_string(), Self::infer_value(field));
            }
            let row = Value::Object(object);

            if !filters.iter().all(|f| Self::matches(&row, f)) {
                continue;
            }
            if total_matches >= offset && (rows.len() as u64) < limit {
                rows.push(row);
            }
            total_matches += 1;
        }

        Ok(Some(Page {
            offset,
            rows,
            total_records: total_matches,
        }))
    }
}
