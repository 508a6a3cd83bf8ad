//! # Page Fetcher Port
//!
//! This Port defines the contract for the data source side of an export.
//!
//! Anything that implements `PageFetcher` must be able to answer a bounded
//! "select top" query: a window of rows at a given offset, plus the total
//! matching row count known at that moment.

use crate::domain::entities::{Page, TableFilter};
use crate::domain::errors::Result;

/// `PageFetcher` abstracts the data source's query engine.
///
/// Contract:
/// - A valid offset with no rows is **not** an error; implementations return
///   a `Page` with empty `rows` and the known total.
/// - `Ok(None)` means the source reported no page object at all without
///   raising. The engine treats this as an abort trigger.
/// - `Err(..)` is a genuine source fault (connection loss, query error) and
///   fails the job.
pub trait PageFetcher: Send + Sync {
    /// Fetches one page of rows from `table` starting at `offset`.
    ///
    /// `result.rows.len()` is at most `limit`; on the final page it may be
    /// shorter. `filters` are interpreted by the implementation, never by
    /// the engine.
    #[allow(clippy::too_many_arguments)]
    fn select_top(
        &self,
        table: &str,
        offset: u64,
        limit: u64,
        order_by: &[String],
        filters: &[TableFilter],
        schema: Option<&str>,
    ) -> Result<Option<Page>>;
}
