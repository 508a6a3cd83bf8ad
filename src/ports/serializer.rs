//! # Serializer Port
//!
//! The contract every output-format plugin (JSON, CSV, SQL, ...) implements.
//! Format plugins are plain values composed into the engine; the engine
//! appends whatever they render verbatim and never inspects it.

use crate::domain::entities::Row;
use crate::domain::errors::Result;

/// A format plugin producing an optional header, an optional footer, and a
/// rendering of one page of rows.
pub trait Serializer: Send + Sync {
    /// Called once, before any row data is written. May inspect the shape of
    /// the first row (e.g. to emit column names) or ignore it. Must tolerate
    /// an absent first row: an empty source still gets its header/footer
    /// pair. `Ok(None)` means "write nothing".
    fn render_header(&self, first_row: Option<&Row>) -> Result<Option<String>>;

    /// Called once, after all rows are written — only on the completion
    /// path, never on abort or pause. `Ok(None)` means "write nothing".
    fn render_footer(&self) -> Result<Option<String>>;

    /// Called once per page; must render every row in the page. The result
    /// is appended to the output followed by the sink's line terminator.
    fn render_chunk(&self, rows: &[Row]) -> Result<String>;
}
