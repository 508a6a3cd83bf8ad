//! Port defining the append-only output target an export writes into.

use crate::domain::errors::Result;

/// `FileSink` is the minimal filesystem contract the engine requires.
///
/// Appends are durable-ordered: a later read sees all prior appends, and
/// `size` reflects every append made so far (no hidden buffering). All
/// operations may fail (disk full, permission denied); failures propagate as
/// job faults.
pub trait FileSink: Send + Sync {
    /// Creates the target for writing, discarding any pre-existing content.
    fn truncate_and_open(&self, target: &str) -> Result<()>;

    /// Appends `content` plus a line terminator to the target.
    fn append_line(&self, target: &str, content: &str) -> Result<()>;

    /// Current size of the target in bytes.
    fn size(&self, target: &str) -> Result<u64>;

    /// Removes the target. Used by the abort cleanup path.
    fn delete(&self, target: &str) -> Result<()>;
}
