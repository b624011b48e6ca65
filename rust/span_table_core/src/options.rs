use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Editor options, read from a JSON object. Missing keys keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    /// Size of a table created by [`crate::TableEditor::insert_table`].
    pub default_rows: usize,
    pub default_cols: usize,
    /// Keep an empty paragraph around every table so the caret can leave it.
    pub pad_tables: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { default_rows: 2, default_cols: 3, pad_tables: true }
    }
}

impl TableOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
