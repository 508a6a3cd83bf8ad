//! SQL INSERT output format.
//!
//! Emits one `INSERT INTO ... VALUES (...);` statement per row. No header or
//! footer; the statements stand alone and can be replayed into any database
//! that accepts double-quoted identifiers and standard string literals.

use crate::domain::entities::Row;
use crate::domain::errors::{ExportError, Result};
use crate::ports::serializer::Serializer;

pub struct SqlSerializer {
    table: String,
    schema: Option<String>,
}

impl SqlSerializer {
    pub fn new(table: impl Into<String>, schema: Option<String>) -> Self {
        Self {
            table: table.into(),
            schema,
        }
    }

    fn qualified_table(&self) -> String {
        match &self.schema {
            Some(s) => format!("\"{}\".\"{}\"", s, self.table),
            None => format!("\"{}\"", self.table),
        }
    }

    fn literal(value: &serde_json::Value) -> Result<String> {
        Ok(match value {
            serde_json::Value::Null => "NULL".to_string(),
            serde_json::Value::Bool(true) => "TRUE".to_string(),
            serde_json::Value::Bool(false) => "FALSE".to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => format!("'{}'", s.replace('\'', "''")),
            // Nested structures are stored as their JSON text.
            other => format!("'{}'", serde_json::to_string(other)?.replace('\'', "''")),
        })
    }
}

impl Serializer for SqlSerializer {
    fn render_header(&self, _first_row: Option<&Row>) -> Result<Option<String>> {
        Ok(None)
    }

    fn render_footer(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn render_chunk(&self, rows: &[Row]) -> Result<String> {
        let mut statements = Vec::with_capacity(rows.len());
        for row in rows {
            let obj = row.as_object().ok_or_else(|| {
                ExportError::Serialize("SQL format requires object rows".to_string())
            })?;
            let columns = obj
                .keys()
                .map(|k| format!("\"{}\"", k))
                .collect::<Vec<_>>()
                .join(", ");
            let values = obj
                .values()
                .map(Self::literal)
                .collect::<Result<Vec<_>>>()?
                .join(", ");
            statements.push(format!(
                "INSERT INTO {} ({}) VALUES ({});",
                self.qualified_table(),
                columns,
                values
            ));
        }
        Ok(statements.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_one_insert_per_row() {
        let s = SqlSerializer::new("users", None);
        let chunk = s
            .render_chunk(&[json!({"id": 1, "name": "ada"}), json!({"id": 2, "name": "grace"})])
            .unwrap();
        assert_eq!(
            chunk,
            "INSERT INTO \"users\" (\"id\", \"name\") VALUES (1, 'ada');\n\
             INSERT INTO \"users\" (\"id\", \"name\") VALUES (2, 'grace');"
        );
    }

    #[test]
    fn schema_qualifies_the_table() {
        let s = SqlSerializer::new("users", Some("app".to_string()));
        let chunk = s.render_chunk(&[json!({"id": 1})]).unwrap();
        assert!(chunk.starts_with("INSERT INTO \"app\".\"users\""));
    }

    #[test]
    fn escapes_quotes_and_renders_null() {
        let s = SqlSerializer::new("t", None);
        let chunk = s
            .render_chunk(&[json!({"a": "o'brien", "b": null, "c": true})])
            .unwrap();
        assert_eq!(
            chunk,
            "INSERT INTO \"t\" (\"a\", \"b\", \"c\") VALUES ('o''brien', NULL, TRUE);"
        );
    }

    #[test]
    fn non_object_row_is_rejected() {
        let s = SqlSerializer::new("t", None);
        assert!(s.render_chunk(&[json!([1, 2])]).is_err());
    }

    #[test]
    fn no_header_or_footer() {
        let s = SqlSerializer::new("t", None);
        assert_eq!(s.render_header(None).unwrap(), None);
        assert_eq!(s.render_footer().unwrap(), None);
    }
}
