//! CLI entry point: exports a CSV data source to a file through one of the
//! built-in serializer plugins.

use clap::Parser;
use log::{error, info};
use serde_json::json;
use std::process;
use std::sync::Arc;

use table_exporter::config::{AppConfig, CliArgs, OutputFormat};
use table_exporter::engine::export_job::ExportJob;
use table_exporter::formats::csv::{CsvOptions, CsvSerializer};
use table_exporter::formats::json::{JsonOptions, JsonSerializer};
use table_exporter::formats::sql::SqlSerializer;
use table_exporter::infrastructure::csv_source::CsvFileSource;
use table_exporter::infrastructure::local_file_sink::LocalFileSink;
use table_exporter::ports::serializer::Serializer;

fn main() {
    // 1. Initialize Logging
    env_logger::init();

    // 2. Parse Arguments
    let args = CliArgs::parse();

    // 3. Load Config
    let mut config = if let Some(config_path) = &args.config {
        match AppConfig::from_file(config_path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load config: {}", e);
                process::exit(1);
            }
        }
    } else {
        AppConfig::default_from_cli(&args)
    };

    // Merge CLI overrides
    if let Err(e) = config.merge_cli(&args) {
        error!("Invalid arguments: {}", e);
        process::exit(1);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        process::exit(1);
    }

    // 4. Wire the engine
    let task = config.to_task();
    let serializer: Box<dyn Serializer> = match config.export.format.unwrap_or(OutputFormat::Json)
    {
        OutputFormat::Json => Box::new(JsonSerializer::new(JsonOptions {
            pretty_print: config.export.pretty_print.unwrap_or(false),
        })),
        OutputFormat::Csv => Box::new(CsvSerializer::new(CsvOptions {
            delimiter: config.export.delimiter.unwrap_or(','),
            include_header: true,
        })),
        OutputFormat::Sql => Box::new(SqlSerializer::new(task.table.clone(), None)),
    };

    let fetcher = Arc::new(CsvFileSource::new(config.source.input.clone()));
    let mut job = ExportJob::new(task, fetcher, serializer, Box::new(LocalFileSink));

    // 5. Run
    match job.run() {
        Ok(summary) => {
            let report = json!({
                "finished_at": chrono::Local::now().to_rfc3339(),
                "summary": summary,
            });
            info!(
                "Export finished: {}",
                serde_json::to_string_pretty(&report).unwrap_or_default()
            );
        }
        Err(e) => {
            error!("Export failed ({}): {}", job.status(), e);
            process::exit(1);
        }
    }
}
