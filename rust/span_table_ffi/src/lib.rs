//! JSON request/response API for native hosts.
//!
//! Every call carries the whole document and selection state and gets both
//! back, so the host keeps ownership and no handle crosses the boundary. The
//! plain `String` signatures are what `flutter_rust_bridge` codegen expects
//! when the `frb` feature is enabled.

use serde::{Deserialize, Serialize};
use span_table_core::{Direction, Doc, NodePath, TableEditor, TableOptions, TableState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub doc: Doc,
    #[serde(default)]
    pub state: TableState,
    #[serde(default)]
    pub options: TableOptions,
    pub command: Command,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    InsertTable { at: usize },
    Focus { cell: NodePath },
    SelectCells { anchor: NodePath, focus: NodePath },
    Insert { direction: Direction },
    DeleteRows,
    DeleteCols,
    MergeCells,
    SplitCells,
    ClearSelection,
    /// Only report menu state.
    Inspect,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub doc: Doc,
    pub state: TableState,
    pub can_merge: bool,
    pub can_split: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<(NodePath, NodePath)>,
}

fn run(request: Request) -> span_table_core::Result<Response> {
    let Request { doc, state, options, command } = request;
    let mut editor = TableEditor { doc, state, options };
    match command {
        Command::InsertTable { at } => {
            editor.insert_table(at);
        }
        Command::Focus { cell } => editor.set_focus(cell)?,
        Command::SelectCells { anchor, focus } => editor.select_cells(&anchor, &focus)?,
        Command::Insert { direction } => editor.insert(direction)?,
        Command::DeleteRows => editor.delete_rows()?,
        Command::DeleteCols => editor.delete_cols()?,
        Command::MergeCells => editor.merge_cells()?,
        Command::SplitCells => editor.split_cells()?,
        Command::ClearSelection => editor.clear_selection()?,
        Command::Inspect => {}
    }
    let bounds = editor.selection_bounds()?;
    Ok(Response {
        can_merge: editor.can_merge(),
        can_split: editor.can_split(),
        bounds,
        doc: editor.doc,
        state: editor.state,
    })
}

/// Apply one command. Errors come back as their display text.
pub fn apply(request_json: String) -> Result<String, String> {
    let request: Request = serde_json::from_str(&request_json).map_err(|e| e.to_string())?;
    let response = run(request).map_err(|e| e.to_string())?;
    serde_json::to_string(&response).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn call(request: Value) -> Value {
        let out = apply(request.to_string()).unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn insert_table_into_empty_doc() {
        let out = call(json!({ "doc": { "nodes": [] }, "command": { "op": "insertTable", "at": 0 } }));
        assert_eq!(out["state"]["focus"], json!([1, 0, 0]));
        assert_eq!(out["doc"]["nodes"].as_array().map(Vec::len), Some(3));
        assert_eq!(out["canMerge"], json!(false));
    }

    #[test]
    fn select_then_merge() {
        let doc = call(json!({ "doc": { "nodes": [] }, "options": { "defaultCols": 2 }, "command": { "op": "insertTable", "at": 0 } }))["doc"].clone();
        let selected = call(json!({
            "doc": doc,
            "command": { "op": "selectCells", "anchor": [1, 0, 0], "focus": [1, 1, 0] }
        }));
        assert_eq!(selected["canMerge"], json!(true));
        assert_eq!(selected["bounds"], json!([[1, 0, 0], [1, 1, 0]]));

        let merged = call(json!({ "doc": selected["doc"], "state": selected["state"], "command": { "op": "mergeCells" } }));
        assert_eq!(merged["doc"]["nodes"][1]["rows"][0]["cells"][0]["rowSpan"], json!(2));
        assert_eq!(merged["canSplit"], json!(true));
    }

    #[test]
    fn insert_uses_direction_names() {
        let doc = call(json!({ "doc": { "nodes": [] }, "command": { "op": "insertTable", "at": 0 } }))["doc"].clone();
        let out = call(json!({
            "doc": doc,
            "state": { "focus": [1, 0, 0] },
            "command": { "op": "insert", "direction": "below" }
        }));
        assert_eq!(out["doc"]["nodes"][1]["rows"].as_array().map(Vec::len), Some(3));
        assert_eq!(out["state"]["focus"], json!([1, 1, 0]));
    }

    #[test]
    fn oversized_spans_are_errors() {
        let doc = json!({ "nodes": [
            { "type": "Paragraph", "text": "" },
            { "type": "Table", "rows": [{ "cells": [{ "colSpan": usize::MAX }, { "colSpan": 2 }] }] }
        ] });
        let request = json!({
            "doc": doc,
            "command": { "op": "selectCells", "anchor": [1, 0, 0], "focus": [1, 0, 1] }
        });
        assert!(apply(request.to_string()).unwrap_err().contains("past the table's extent"));
    }

    #[test]
    fn errors_are_strings() {
        assert!(apply("{".to_string()).is_err());
        let bad = json!({ "doc": { "nodes": [] }, "command": { "op": "focus", "cell": [0, 0, 0] } });
        assert!(apply(bad.to_string()).unwrap_err().contains("[0, 0, 0]"));
    }
}
