//! # Export Job
//!
//! The orchestrator of a single export run: owns the lifecycle state
//! machine, drives the fetch→serialize→write loop, aggregates counters, and
//! exposes pause/abort control to other threads.
//!
//! One `ExportJob` per invocation; jobs are not shared or reused. There is
//! no resume path: a paused or aborted job is dead with respect to export
//! progress.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::domain::entities::{ExportStatus, ExportSummary, ExportTask, Page, Row};
use crate::domain::errors::{ExportError, Result};
use crate::engine::progress::{Clock, ProgressEstimator, SystemClock};
use crate::ports::file_sink::FileSink;
use crate::ports::page_fetcher::PageFetcher;
use crate::ports::serializer::Serializer;

/// Lifecycle state shared between the running loop and external callers.
///
/// The loop reads the cell at the top of each iteration; `pause`/`abort`
/// store into it from any thread. A single atomic keeps the store and the
/// loop's read coherent without a lock.
pub struct StatusCell(AtomicU8);

impl StatusCell {
    fn new(status: ExportStatus) -> Self {
        Self(AtomicU8::new(status as u8))
    }

    pub fn load(&self) -> ExportStatus {
        ExportStatus::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn store(&self, status: ExportStatus) {
        self.0.store(status as u8, Ordering::SeqCst);
    }
}

/// Cloneable control surface for a running job.
///
/// Both signals are cooperative: the loop checks state only at iteration
/// boundaries, so a signal delivered during an in-flight page fetch or write
/// takes effect after that operation completes. Signalling a job that is no
/// longer exporting overwrites the recorded state but has no further effect.
#[derive(Clone)]
pub struct ExportHandle {
    status: Arc<StatusCell>,
}

impl ExportHandle {
    /// Stops the loop after the in-flight page. The partial output file is
    /// kept on disk and counters freeze at their last values.
    pub fn pause(&self) {
        self.status.store(ExportStatus::Paused);
    }

    /// Stops the loop after the in-flight page and deletes the output file.
    pub fn abort(&self) {
        self.status.store(ExportStatus::Aborted);
    }

    pub fn status(&self) -> ExportStatus {
        self.status.load()
    }
}

/// A single export run: fetches pages from a `PageFetcher`, renders them
/// through a `Serializer`, and appends them to a `FileSink`.
pub struct ExportJob {
    task: ExportTask,
    fetcher: Arc<dyn PageFetcher>,
    serializer: Box<dyn Serializer>,
    sink: Box<dyn FileSink>,
    clock: Arc<dyn Clock>,
    status: Arc<StatusCell>,
    estimator: ProgressEstimator,
    rows_exported: u64,
    total_records: u64,
    file_size: u64,
    time_left: Duration,
}

impl ExportJob {
    pub fn new(
        task: ExportTask,
        fetcher: Arc<dyn PageFetcher>,
        serializer: Box<dyn Serializer>,
        sink: Box<dyn FileSink>,
    ) -> Self {
        Self::with_clock(task, fetcher, serializer, sink, Arc::new(SystemClock))
    }

    /// Like [`ExportJob::new`] but with an injected time source, so tests
    /// can drive the ETA math deterministically.
    pub fn with_clock(
        task: ExportTask,
        fetcher: Arc<dyn PageFetcher>,
        serializer: Box<dyn Serializer>,
        sink: Box<dyn FileSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            task,
            fetcher,
            serializer,
            sink,
            clock,
            status: Arc::new(StatusCell::new(ExportStatus::Idle)),
            estimator: ProgressEstimator::new(),
            rows_exported: 0,
            total_records: 0,
            file_size: 0,
            time_left: Duration::ZERO,
        }
    }

    /// Returns a cloneable handle for pausing or aborting this job from
    /// another thread.
    pub fn handle(&self) -> ExportHandle {
        ExportHandle {
            status: Arc::clone(&self.status),
        }
    }

    pub fn status(&self) -> ExportStatus {
        self.status.load()
    }

    /// Rows written so far. Monotonically non-decreasing while exporting.
    pub fn rows_exported(&self) -> u64 {
        self.rows_exported
    }

    /// Total matching rows as reported by the most recent page. May be
    /// stale until the first page returns.
    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Output size in bytes, as last reported by the sink.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Estimated time remaining, derived from the previous page's duration.
    /// Zero until the second page completes.
    pub fn time_left(&self) -> Duration {
        self.time_left
    }

    /// Runs the job to a terminal state.
    ///
    /// Outcomes:
    /// - `Ok(summary)` with status `Completed` — all rows written, footer
    ///   appended.
    /// - `Ok(summary)` with status `Paused` — loop stopped early; the
    ///   partial file stays on disk. Callers must inspect the status field.
    /// - `Err(ExportError::Aborted)` — cancelled (externally or by the
    ///   source returning no page); the output file has been deleted.
    /// - any other `Err` — a fetch/serialize/write fault; status is `Error`
    ///   and the partial output file is left on disk.
    pub fn run(&mut self) -> Result<ExportSummary> {
        let result = self.run_inner();
        match &result {
            // Aborted already recorded its own state before cleanup.
            Err(ExportError::Aborted) => {}
            Err(e) => {
                self.status.store(ExportStatus::Error);
                error!("export of {} failed: {}", self.task.table, e);
            }
            Ok(_) => {}
        }
        result
    }

    fn run_inner(&mut self) -> Result<ExportSummary> {
        if self.task.page_size == 0 {
            return Err(ExportError::Config("page_size must be > 0".to_string()));
        }

        let started = self.clock.now_millis();
        let target = self.task.output_file.clone();

        // Probe for a representative first row. An empty or absent probe is
        // fine: the serializer still emits its header/footer pair.
        let probe = self.fetch_page(0, 1)?;
        let first_row: Option<Row> = probe.as_ref().and_then(|p| p.rows.first().cloned());
        if let Some(p) = &probe {
            self.total_records = p.total_records;
        }

        let header = self.serializer.render_header(first_row.as_ref())?;
        let footer = self.serializer.render_footer()?;

        self.status.store(ExportStatus::Exporting);
        info!(
            "exporting {} to {} ({} rows known, page size {})",
            self.task.table, target, self.total_records, self.task.page_size
        );

        self.sink.truncate_and_open(&target)?;
        if let Some(h) = &header {
            self.sink.append_line(&target, h)?;
        }

        while self.rows_exported < self.total_records
            && self.status.load() == ExportStatus::Exporting
        {
            let page = self.fetch_page(self.rows_exported, self.task.page_size)?;
            let Some(page) = page else {
                warn!(
                    "source returned no page at offset {}; aborting {}",
                    self.rows_exported, self.task.table
                );
                self.status.store(ExportStatus::Aborted);
                break;
            };

            let chunk = self.serializer.render_chunk(&page.rows)?;
            if !chunk.is_empty() {
                self.sink.append_line(&target, &chunk)?;
            }

            self.total_records = page.total_records;
            if page.rows.is_empty() {
                // The source shrank between pages; a stale larger total
                // must not keep the loop spinning on an empty window.
                break;
            }
            self.rows_exported += page.rows.len() as u64;
            self.file_size = self.sink.size(&target)?;

            let remaining = self.total_records.saturating_sub(self.rows_exported);
            if let Some(eta) = self.estimator.on_page_complete(
                self.clock.now_millis(),
                remaining,
                self.task.page_size,
            ) {
                self.time_left = eta;
            }

            debug!(
                "{}: {}/{} rows, {} bytes, ~{:?} left",
                self.task.table, self.rows_exported, self.total_records, self.file_size,
                self.time_left
            );
        }

        match self.status.load() {
            ExportStatus::Aborted => {
                // A delete failure here surfaces as an I/O fault rather than
                // being swallowed: it leaves inconsistent disk state.
                self.sink.delete(&target)?;
                info!(
                    "export of {} aborted after {} rows; output deleted",
                    self.task.table, self.rows_exported
                );
                Err(ExportError::Aborted)
            }
            ExportStatus::Paused => {
                info!(
                    "export of {} paused at {}/{} rows; partial output kept",
                    self.task.table, self.rows_exported, self.total_records
                );
                Ok(self.summary(started))
            }
            _ => {
                if let Some(f) = &footer {
                    self.sink.append_line(&target, f)?;
                }
                self.status.store(ExportStatus::Completed);
                info!(
                    "export of {} completed: {} rows, {} bytes",
                    self.task.table, self.rows_exported, self.file_size
                );
                Ok(self.summary(started))
            }
        }
    }

    fn fetch_page(&self, offset: u64, limit: u64) -> Result<Option<Page>> {
        self.fetcher.select_top(
            &self.task.table,
            offset,
            limit,
            &[],
            &self.task.filters,
            self.task.schema.as_deref(),
        )
    }

    fn summary(&self, started_millis: u64) -> ExportSummary {
        let elapsed = self.clock.now_millis().saturating_sub(started_millis);
        ExportSummary {
            table: self.task.table.clone(),
            output_file: self.task.output_file.clone(),
            rows: self.rows_exported,
            bytes: self.file_size,
            duration_secs: elapsed as f64 / 1000.0,
            status: self.status.load(),
        }
    }
}
