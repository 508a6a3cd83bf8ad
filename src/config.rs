//! Job configuration: file-based config (YAML or JSON) merged with CLI
//! overrides.

use clap::Parser;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::entities::{
    ExportTask, FilterOp, TableFilter, DEFAULT_PAGE_SIZE,
};
use crate::domain::errors::{ExportError, Result};

/// Output format selector, shared between config files and CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Sql,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Path to the CSV file serving as the data source.
    pub input: String,
    /// Logical table name. Defaults to the input file stem.
    pub table: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    pub output_file: String,
    pub format: Option<OutputFormat>,
    pub page_size: Option<u64>,
    /// JSON format option.
    pub pretty_print: Option<bool>,
    /// CSV format option.
    pub delimiter: Option<char>,
    pub filters: Option<Vec<TableFilter>>,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    // Overrides for ad-hoc runs
    /// CSV file to export from
    #[arg(short, long)]
    pub input: Option<String>,
    /// Output file path
    #[arg(short, long)]
    pub output: Option<String>,
    /// Logical table name (defaults to the input file stem)
    #[arg(long)]
    pub table: Option<String>,
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Rows per fetch
    #[arg(long)]
    pub page_size: Option<u64>,
    /// Pretty-print JSON rows
    #[arg(long)]
    pub pretty: bool,
    /// Row filter, `field=value`; repeatable
    #[arg(long = "filter")]
    pub filters: Vec<String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: AppConfig = if path.ends_with(".json") {
            serde_json::from_str(&contents)
                .map_err(|e| ExportError::Config(e.to_string()))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| ExportError::Config(e.to_string()))?
        };

        Ok(config)
    }

    pub fn default_from_cli(args: &CliArgs) -> Self {
        Self {
            source: SourceConfig {
                input: args.input.clone().unwrap_or_default(),
                table: args.table.clone(),
            },
            export: ExportConfig {
                output_file: args.output.clone().unwrap_or_default(),
                format: args.format,
                page_size: args.page_size,
                pretty_print: if args.pretty { Some(true) } else { None },
                delimiter: None,
                filters: None,
            },
        }
    }

    pub fn merge_cli(&mut self, args: &CliArgs) -> Result<()> {
        if let Some(i) = &args.input {
            self.source.input = i.clone();
        }
        if let Some(t) = &args.table {
            self.source.table = Some(t.clone());
        }
        if let Some(o) = &args.output {
            self.export.output_file = o.clone();
        }
        if let Some(f) = args.format {
            self.export.format = Some(f);
        }
        if let Some(p) = args.page_size {
            self.export.page_size = Some(p);
        }
        if args.pretty {
            self.export.pretty_print = Some(true);
        }
        if !args.filters.is_empty() {
            let mut parsed = Vec::with_capacity(args.filters.len());
            for raw in &args.filters {
                parsed.push(parse_cli_filter(raw)?);
            }
            self.export
                .filters
                .get_or_insert_with(Vec::new)
                .extend(parsed);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.input.is_empty() {
            return Err(ExportError::Config("no input file given".to_string()));
        }
        if self.export.output_file.is_empty() {
            return Err(ExportError::Config("no output file given".to_string()));
        }
        if self.export.page_size == Some(0) {
            return Err(ExportError::Config("page_size must be > 0".to_string()));
        }
        Ok(())
    }

    /// Logical table name: explicit config, or the input file stem.
    pub fn table(&self) -> String {
        self.source.table.clone().unwrap_or_else(|| {
            Path::new(&self.source.input)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "table".to_string())
        })
    }

    /// Builds the engine's job instructions from this configuration.
    pub fn to_task(&self) -> ExportTask {
        ExportTask {
            table: self.table(),
            schema: None,
            output_file: self.export.output_file.clone(),
            page_size: self.export.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            filters: self.export.filters.clone().unwrap_or_default(),
        }
    }
}

/// Parses a CLI `--filter field=value` into an equality predicate. The value
/// side is interpreted as JSON when it parses as such (`42`, `true`),
/// otherwise kept as a string.
fn parse_cli_filter(raw: &str) -> Result<TableFilter> {
    let Some((field, value)) = raw.split_once('=') else {
        return Err(ExportError::Config(format!(
            "invalid filter '{}', expected field=value",
            raw
        )));
    };
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok(TableFilter {
        field: field.to_string(),
        op: FilterOp::Eq,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml_config() {
        let yaml = r#"
source:
  input: "./people.csv"
  table: "people"
export:
  output_file: "./people.json"
  format: json
  page_size: 100
  pretty_print: true
  filters:
    - field: age
      op: gte
      value: 21
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", yaml).unwrap();
        let path = file.path().to_str().unwrap();

        let config = AppConfig::from_file(path).expect("Failed to parse config");

        assert_eq!(config.source.input, "./people.csv");
        assert_eq!(config.export.format, Some(OutputFormat::Json));
        assert_eq!(config.export.page_size, Some(100));
        assert_eq!(config.export.filters.as_ref().unwrap().len(), 1);

        let task = config.to_task();
        assert_eq!(task.table, "people");
        assert_eq!(task.page_size, 100);
    }

    #[test]
    fn cli_overrides_win() {
        let yaml = r#"
source:
  input: "./a.csv"
export:
  output_file: "./a.json"
  page_size: 100
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", yaml).unwrap();
        let mut config = AppConfig::from_file(file.path().to_str().unwrap()).unwrap();

        let args = CliArgs {
            config: None,
            input: None,
            output: Some("./b.json".to_string()),
            table: None,
            format: Some(OutputFormat::Csv),
            page_size: Some(50),
            pretty: false,
            filters: vec!["name=ada".to_string(), "age=36".to_string()],
        };
        config.merge_cli(&args).unwrap();

        assert_eq!(config.export.output_file, "./b.json");
        assert_eq!(config.export.format, Some(OutputFormat::Csv));
        assert_eq!(config.export.page_size, Some(50));

        let filters = config.export.filters.unwrap();
        assert_eq!(filters[0].value, serde_json::json!("ada"));
        assert_eq!(filters[1].value, serde_json::json!(36));
    }

    #[test]
    fn validate_rejects_bad_configs() {
        let args = CliArgs {
            config: None,
            input: Some("in.csv".to_string()),
            output: Some("out.json".to_string()),
            table: None,
            format: None,
            page_size: Some(0),
            pretty: false,
            filters: vec![],
        };
        let config = AppConfig::default_from_cli(&args);
        assert!(matches!(config.validate(), Err(ExportError::Config(_))));

        let args = CliArgs {
            config: None,
            input: None,
            output: Some("out.json".to_string()),
            table: None,
            format: None,
            page_size: None,
            pretty: false,
            filters: vec![],
        };
        let config = AppConfig::default_from_cli(&args);
        assert!(matches!(config.validate(), Err(ExportError::Config(_))));
    }

    #[test]
    fn table_defaults_to_input_stem() {
        let args = CliArgs {
            config: None,
            input: Some("/data/users.csv".to_string()),
            output: Some("out.json".to_string()),
            table: None,
            format: None,
            page_size: None,
            pretty: false,
            filters: vec![],
        };
        let config = AppConfig::default_from_cli(&args);
        assert_eq!(config.table(), "users");
    }

    #[test]
    fn malformed_cli_filter_is_rejected() {
        assert!(parse_cli_filter("no-equals-sign").is_err());
        let f = parse_cli_filter("active=true").unwrap();
        assert_eq!(f.value, serde_json::json!(true));
    }
}
