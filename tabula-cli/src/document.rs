//! JSON table documents

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabula::column::{ColumnDef, ColumnDefaults};
use tabula::row::RowData;
use tabula::table::TableOptions;

use crate::error::CliError;

/// A column as written in a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    pub id: String,
    pub header: Option<String>,
    pub columns: Vec<ColumnSpec>,
    pub enable_hiding: Option<bool>,
    pub default_is_visible: Option<bool>,
}

impl ColumnSpec {
    fn to_def(&self) -> ColumnDef {
        let mut def = ColumnDef::new(&self.id)
            .columns(self.columns.iter().map(ColumnSpec::to_def).collect());
        def.header = self.header.clone();
        def.enable_hiding = self.enable_hiding;
        def.default_is_visible = self.default_is_visible;
        def
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<RowData>,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CliError::Document {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_options(self) -> TableOptions {
        TableOptions::new()
            .with_columns(self.columns.iter().map(ColumnSpec::to_def).collect())
            .with_data(self.rows)
            .with_default_column(ColumnDefaults::new().with_cell(|ctx| format_value(ctx.value)))
    }
}

/// Strings print bare, null prints empty, everything else as JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_columns() {
        let doc: Document = serde_json::from_value(json!({
            "columns": [
                { "id": "name", "header": "Name" },
                { "id": "contact", "columns": [{ "id": "email", "default_is_visible": false }] }
            ],
            "rows": [{ "id": "r1", "values": { "name": "Ada" } }]
        }))
        .unwrap();

        let options = doc.into_options();
        assert_eq!(options.columns[1].columns[0].default_is_visible, Some(false));
        assert_eq!(options.columns[0].header.as_deref(), Some("Name"));
        assert_eq!(options.data.len(), 1);
    }

    #[test]
    fn test_rows_without_values() {
        let doc: Document = serde_json::from_str(r#"{ "rows": [{ "id": "r1" }] }"#).unwrap();
        assert!(doc.rows[0].values.is_empty());
        assert!(doc.columns.is_empty());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("Ada")), "Ada");
        assert_eq!(format_value(&json!(null)), "");
        assert_eq!(format_value(&json!(36)), "36");
        assert_eq!(format_value(&json!(true)), "true");
    }
}
