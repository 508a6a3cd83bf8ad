//! JSON-array output format, the reference serializer.
//!
//! Output shape: `[` on its own line, then every row as a JSON object
//! followed by a trailing `,`, one per line — including after the last row —
//! then `]` on its own line. The trailing separator before the closing
//! bracket is the historical output of this format and is preserved exactly
//! for compatibility; changing it requires explicit sign-off as a format
//! change.

use serde::Deserialize;

use crate::domain::entities::Row;
use crate::domain::errors::Result;
use crate::ports::serializer::Serializer;

/// Options recognized by the JSON format.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct JsonOptions {
    /// Renders each row with 2-space indentation when set.
    #[serde(default)]
    pub pretty_print: bool,
}

pub struct JsonSerializer {
    options: JsonOptions,
}

impl JsonSerializer {
    pub fn new(options: JsonOptions) -> Self {
        Self { options }
    }
}

impl Serializer for JsonSerializer {
    fn render_header(&self, _first_row: Option<&Row>) -> Result<Option<String>> {
        Ok(Some("[".to_string()))
    }

    fn render_footer(&self) -> Result<Option<String>> {
        Ok(Some("]".to_string()))
    }

    fn render_chunk(&self, rows: &[Row]) -> Result<String> {
        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let rendered = if self.options.pretty_print {
                serde_json::to_string_pretty(row)?
            } else {
                serde_json::to_string(row)?
            };
            lines.push(format!("{},", rendered));
        }
        Ok(lines.join("\n"))
    }
}
