use wasm_bindgen::prelude::*;
use span_table_core::{NodePath, TableEditor, TableOptions};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// Paths cross the boundary as JSON arrays, e.g. "[1,0,2]".
fn path(json: &str) -> Result<NodePath, JsValue> {
    serde_json::from_str(json).map_err(js_err)
}

#[wasm_bindgen]
pub struct Editor {
    core: TableEditor,
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor { core: TableEditor::new_empty() }
    }

    pub fn new_empty() -> Editor { Self::new() }

    pub fn from_json(json: String) -> Result<Editor, JsValue> {
        TableEditor::from_json(&json).map(|core| Editor { core }).map_err(js_err)
    }

    pub fn with_options(json: String, options_json: String) -> Result<Editor, JsValue> {
        let options = TableOptions::from_json(&options_json).map_err(js_err)?;
        TableEditor::from_json_with_options(&json, options).map(|core| Editor { core }).map_err(js_err)
    }

    pub fn to_json(&self) -> String { self.core.to_json() }
    pub fn state_json(&self) -> String { self.core.state_json() }
    pub fn set_state_json(&mut self, json: String) -> Result<(), JsValue> { self.core.set_state_json(&json).map_err(js_err) }

    // Selection
    pub fn set_focus(&mut self, cell: String) -> Result<(), JsValue> { self.core.set_focus(path(&cell)?).map_err(js_err) }
    pub fn select_cells(&mut self, anchor: String, focus: String) -> Result<(), JsValue> {
        self.core.select_cells(&path(&anchor)?, &path(&focus)?).map_err(js_err)
    }

    /// Returns the first cell path of the new table, or `undefined` when refused.
    pub fn insert_table(&mut self, at: u32) -> Option<String> {
        self.core.insert_table(at as usize).map(|p| p.to_string())
    }

    // Context menu
    pub fn insert_row_above(&mut self) -> Result<(), JsValue> { self.core.insert_row_above().map_err(js_err) }
    pub fn insert_row_below(&mut self) -> Result<(), JsValue> { self.core.insert_row_below().map_err(js_err) }
    pub fn insert_col_left(&mut self) -> Result<(), JsValue> { self.core.insert_col_left().map_err(js_err) }
    pub fn insert_col_right(&mut self) -> Result<(), JsValue> { self.core.insert_col_right().map_err(js_err) }
    pub fn delete_rows(&mut self) -> Result<(), JsValue> { self.core.delete_rows().map_err(js_err) }
    pub fn delete_cols(&mut self) -> Result<(), JsValue> { self.core.delete_cols().map_err(js_err) }
    pub fn merge_cells(&mut self) -> Result<(), JsValue> { self.core.merge_cells().map_err(js_err) }
    pub fn split_cells(&mut self) -> Result<(), JsValue> { self.core.split_cells().map_err(js_err) }
    pub fn clear_selection(&mut self) -> Result<(), JsValue> { self.core.clear_selection().map_err(js_err) }

    pub fn can_merge(&self) -> bool { self.core.can_merge() }
    pub fn can_split(&self) -> bool { self.core.can_split() }

    /// `[[topLeft], [bottomRight]]` cell paths, or `undefined` without a selection.
    pub fn selection_bounds(&self) -> Result<Option<String>, JsValue> {
        let bounds = self.core.selection_bounds().map_err(js_err)?;
        Ok(bounds.map(|(tl, br)| format!("[{tl},{br}]")))
    }
}

impl Default for Editor {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_sanity() {
        let mut e = Editor::new_empty();
        assert_eq!(e.insert_table(0).as_deref(), Some("[1, 0, 0]"));
        assert!(e.to_json().contains("\"Table\""));
        e.select_cells("[1,0,0]".into(), "[1,0,1]".into()).unwrap();
        assert!(e.can_merge());
        e.merge_cells().unwrap();
        assert!(e.can_split());
        assert!(e.to_json().contains("\"colSpan\":2"));
    }
}
