//! # Domain Entities
//!
//! Entities are the "Nouns" of the exporter: pages, filters, job
//! instructions, lifecycle states, and run summaries.
//!
//! We use the `serde` crate (Serialize/Deserialize) so these structs can be
//! loaded from config files and written out in run reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single row as returned by the data source. Always a JSON object;
/// key order follows the source's column order.
pub type Row = serde_json::Value;

/// One fetch result: the rows returned at a given offset plus the total row
/// count known at fetch time.
///
/// `total_records` may be approximate or eventually consistent depending on
/// the source; the engine re-reads it from every page rather than trusting
/// an earlier value.
#[derive(Debug, Clone)]
pub struct Page {
    /// The row offset that was requested.
    pub offset: u64,
    /// The rows returned. May be shorter than the requested limit on the
    /// final page.
    pub rows: Vec<Row>,
    /// Total matching rows known at fetch time.
    pub total_records: u64,
}

/// Lifecycle state of an export job.
///
/// `Exporting` is the only state that permits further page fetches. There is
/// no transition back into `Exporting`: a paused or aborted job is dead with
/// respect to export progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExportStatus {
    Idle = 0,
    Exporting = 1,
    Paused = 2,
    Aborted = 3,
    Completed = 4,
    Error = 5,
}

impl ExportStatus {
    /// Inverse of the `repr(u8)` discriminant, for loading out of an atomic.
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => ExportStatus::Exporting,
            2 => ExportStatus::Paused,
            3 => ExportStatus::Aborted,
            4 => ExportStatus::Completed,
            5 => ExportStatus::Error,
            _ => ExportStatus::Idle,
        }
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportStatus::Idle => "IDLE",
            ExportStatus::Exporting => "EXPORTING",
            ExportStatus::Paused => "PAUSED",
            ExportStatus::Aborted => "ABORTED",
            ExportStatus::Completed => "COMPLETED",
            ExportStatus::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Comparison operator of a row filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// SQL-style pattern match; `%` wildcards at either end are honored.
    Like,
}

/// A single row filter predicate. Opaque to the engine: it is passed through
/// to the `PageFetcher`, which decides how to apply it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: serde_json::Value,
}

/// `ExportTask` is the instruction sheet for one export job: what to read,
/// where to write it, and how to page through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTask {
    /// Table or view to export.
    pub table: String,
    /// Optional schema qualifier, passed through to the fetcher.
    pub schema: Option<String>,
    /// Where to save the resulting file. Any pre-existing content at this
    /// path is discarded when the run starts.
    pub output_file: String,
    /// Rows per fetch. Must be greater than zero.
    pub page_size: u64,
    /// Row filter predicates forwarded to the fetcher.
    #[serde(default)]
    pub filters: Vec<TableFilter>,
}

/// Default rows-per-fetch when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 500;

impl ExportTask {
    /// Creates a task with the default page size and no filters.
    pub fn new(table: impl Into<String>, output_file: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
            output_file: output_file.into(),
            page_size: DEFAULT_PAGE_SIZE,
            filters: Vec::new(),
        }
    }
}

/// `ExportSummary` is the "Report Card" for a finished (or stopped) run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub table: String,
    pub output_file: String,
    /// How many rows were actually exported.
    pub rows: u64,
    /// Size of the output file in bytes, as last reported by the sink.
    pub bytes: u64,
    /// How long the run took (in seconds).
    pub duration_secs: f64,
    /// Terminal state of the job (`COMPLETED` or `PAUSED` on the Ok path).
    pub status: ExportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_u8() {
        for s in [
            ExportStatus::Idle,
            ExportStatus::Exporting,
            ExportStatus::Paused,
            ExportStatus::Aborted,
            ExportStatus::Completed,
            ExportStatus::Error,
        ] {
            assert_eq!(ExportStatus::from_u8(s as u8), s);
        }
    }

    #[test]
    fn task_defaults() {
        let task = ExportTask::new("users", "/tmp/users.json");
        assert_eq!(task.page_size, DEFAULT_PAGE_SIZE);
        assert!(task.filters.is_empty());
        assert!(task.schema.is_none());
    }

    #[test]
    fn filter_deserializes_from_yaml() {
        let yaml = r#"
field: age
op: gte
value: 21
"#;
        let f: TableFilter = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(f.field, "age");
        assert_eq!(f.op, FilterOp::Gte);
        assert_eq!(f.value, serde_json::json!(21));
    }
}
