//! # Table Exporter
//!
//! Streams the contents of a queryable tabular data source to a file in
//! bounded-size pages, through a pluggable output serializer, while tracking
//! progress and supporting mid-flight cancellation.
//!
//! The crate follows the **Hexagonal Architecture** (Ports and Adapters) to
//! keep the export engine independent of any concrete data source or
//! filesystem:
//!
//! - [`ports`] defines the three leaf contracts the engine consumes:
//!   [`ports::page_fetcher::PageFetcher`], [`ports::file_sink::FileSink`]
//!   and [`ports::serializer::Serializer`].
//! - [`engine`] owns the lifecycle state machine and the
//!   fetch→serialize→write loop ([`engine::export_job::ExportJob`]).
//! - [`formats`] ships the built-in serializer plugins (JSON, CSV, SQL).
//! - [`infrastructure`] provides concrete adapters: a local-filesystem sink
//!   and a CSV-file-backed page fetcher used by the CLI and tests.

pub mod config;
pub mod domain;
pub mod engine;
pub mod formats;
pub mod infrastructure;
pub mod ports;
