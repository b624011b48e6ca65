pub mod doc;
pub mod error;
pub mod grid;
pub mod ops;
pub mod options;
pub mod path;
pub mod range;
pub mod selection;
pub mod translate;
pub mod tree;

#[cfg(test)]
mod testing;

pub use doc::{Doc, Node, Table, TableCell, TableRow};
pub use error::{Result, TableError};
pub use grid::{CellPos, Coord, GridEntry, LogicalGrid, Rect};
pub use ops::Direction;
pub use options::TableOptions;
pub use path::NodePath;
pub use selection::TableState;
pub use tree::{Fragment, NodeRef, SpanProps, TreeEdit};

use translate::{absolute_path, table_of};
use tree::{cell_at, table_at};

/// A document plus the table selection state, driven by host bindings.
#[derive(Debug, Default)]
pub struct TableEditor {
    pub doc: Doc,
    pub state: TableState,
    pub options: TableOptions,
}

impl TableEditor {
    pub fn new_empty() -> Self {
        Self::with_options(TableOptions::default())
    }

    pub fn with_options(options: TableOptions) -> Self {
        Self { doc: Doc::default(), state: TableState::default(), options }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_options(json, TableOptions::default())
    }

    pub fn from_json_with_options(json: &str, options: TableOptions) -> Result<Self> {
        let mut doc: Doc = serde_json::from_str(json)?;
        if options.pad_tables {
            doc.pad_tables();
        }
        Ok(Self { doc, state: TableState::default(), options })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.doc).unwrap_or_else(|_| "{\"nodes\":[]}".to_string())
    }

    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the selection state, e.g. one kept by the host across reloads.
    pub fn set_state_json(&mut self, json: &str) -> Result<()> {
        let state: TableState = serde_json::from_str(json)?;
        self.doc.select(state.focus.clone());
        self.state = state;
        Ok(())
    }

    pub fn set_focus(&mut self, cell: NodePath) -> Result<()> {
        cell_at(&self.doc, &cell)?;
        self.doc.select(Some(cell.clone()));
        self.state = TableState::focused(cell);
        Ok(())
    }

    /// Drag selection from `anchor` to `focus`.
    pub fn select_cells(&mut self, anchor: &NodePath, focus: &NodePath) -> Result<()> {
        self.state = range::select_cells(&self.doc, anchor, focus)?;
        self.doc.select(self.state.focus.clone());
        Ok(())
    }

    fn focus_in_table(&self) -> bool {
        let block = self.state.focus.as_ref().and_then(|f| f.as_slice().first().copied());
        block.map_or(false, |i| self.doc.table(i).is_some())
    }

    /// Insert a table of the configured size at block index `at` and focus its
    /// first cell. Refused while the caret is inside a table.
    pub fn insert_table(&mut self, at: usize) -> Option<NodePath> {
        if self.focus_in_table() {
            tracing::debug!("caret is inside a table, not inserting another");
            return None;
        }
        let at = at.min(self.doc.nodes.len());
        let ordinal = self.doc.nodes[..at].iter().filter(|n| n.as_table().is_some()).count();
        self.doc.insert_table(at, self.options.default_rows, self.options.default_cols);
        if self.options.pad_tables {
            self.doc.pad_tables();
        }
        let index = self.doc.nodes.iter().enumerate().filter(|(_, n)| n.as_table().is_some()).nth(ordinal)?.0;
        let cell = NodePath::from([index, 0, 0]);
        self.doc.select(Some(cell.clone()));
        self.state = TableState::focused(cell.clone());
        Some(cell)
    }

    fn apply(&mut self, op: impl FnOnce(&mut Doc, &TableState) -> Result<TableState>) -> Result<()> {
        self.state = op(&mut self.doc, &self.state)?;
        Ok(())
    }

    pub fn insert(&mut self, direction: Direction) -> Result<()> {
        self.apply(|d, s| ops::insert_line(d, s, direction))
    }

    pub fn insert_row_above(&mut self) -> Result<()> { self.insert(Direction::Above) }
    pub fn insert_row_below(&mut self) -> Result<()> { self.insert(Direction::Below) }
    pub fn insert_col_left(&mut self) -> Result<()> { self.insert(Direction::Left) }
    pub fn insert_col_right(&mut self) -> Result<()> { self.insert(Direction::Right) }
    pub fn delete_rows(&mut self) -> Result<()> { self.apply(ops::delete_rows) }
    pub fn delete_cols(&mut self) -> Result<()> { self.apply(ops::delete_cols) }
    pub fn merge_cells(&mut self) -> Result<()> { self.apply(ops::merge_cells) }
    pub fn split_cells(&mut self) -> Result<()> { self.apply(ops::split_cells) }
    pub fn clear_selection(&mut self) -> Result<()> { self.apply(ops::clear_cells) }

    // Context menu predicates
    pub fn can_merge(&self) -> bool { self.state.can_merge() }
    pub fn can_split(&self) -> bool { self.state.can_split(&self.doc) }

    /// Top-left and bottom-right cells of the current selection.
    pub fn selection_bounds(&self) -> Result<Option<(NodePath, NodePath)>> {
        let targets = self.state.targets();
        let Some(first) = targets.first() else { return Ok(None) };
        let table = table_of(first)?;
        let grid = LogicalGrid::project(table_at(&self.doc, &table)?)?;
        let cells = targets.iter().map(|p| translate::relative_path(p, &table)).collect::<Result<Vec<_>>>()?;
        let corners = range::selection_corners(&grid, &cells)?;
        Ok(corners.map(|(tl, br)| (absolute_path(&table, tl), absolute_path(&table, br))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(path: [usize; 3]) -> NodePath {
        NodePath::from(path)
    }

    #[test]
    fn insert_table_pads_and_focuses() {
        let mut ed = TableEditor::new_empty();
        let at = ed.insert_table(0).unwrap();
        assert_eq!(at, cell([1, 0, 0]));
        assert_eq!(ed.doc.nodes.len(), 3);
        assert_eq!(ed.doc.table(1).map(|t| (t.rows.len(), t.col_count())), Some((2, 3)));
        assert_eq!(ed.doc.caret, Some(at));
        // The caret is in a table now.
        assert_eq!(ed.insert_table(0), None);
    }

    #[test]
    fn insert_table_after_another_table() {
        let mut ed = TableEditor::new_empty();
        ed.insert_table(0);
        ed.set_focus(cell([1, 0, 0])).unwrap();
        ed.state = TableState::default();
        let at = ed.insert_table(2).unwrap();
        assert_eq!(at, cell([3, 0, 0]));
        assert!(ed.doc.table(3).is_some());
        assert_eq!(ed.doc.nodes.len(), 5);
    }

    #[test]
    fn menu_flow_merge_then_split() {
        let mut ed = TableEditor::with_options(TableOptions { default_rows: 2, default_cols: 2, pad_tables: true });
        ed.insert_table(0);
        ed.select_cells(&cell([1, 0, 0]), &cell([1, 1, 1])).unwrap();
        assert!(ed.can_merge());
        assert_eq!(ed.selection_bounds().unwrap(), Some((cell([1, 0, 0]), cell([1, 1, 1]))));
        ed.merge_cells().unwrap();
        assert_eq!(ed.state.focus, Some(cell([1, 0, 0])));
        assert!(ed.can_split());
        assert!(!ed.can_merge());
        ed.split_cells().unwrap();
        let t = ed.doc.table(1).unwrap();
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.cell_count(), 4);
    }

    #[test]
    fn json_round_trip_keeps_spans() {
        let json = r#"{"nodes":[{"type":"Paragraph","text":"x"},{"type":"Table","rows":[{"cells":[{"colSpan":2}]},{"cells":[{},{}]}]},{"type":"Paragraph","text":""}]}"#;
        let mut ed = TableEditor::from_json(json).unwrap();
        assert_eq!(ed.doc.nodes.len(), 3);
        ed.set_state_json(r#"{"focus":[1,1,1]}"#).unwrap();
        ed.insert_col_right().unwrap();
        let back = TableEditor::from_json(&ed.to_json()).unwrap();
        let t = back.doc.table(1).unwrap();
        assert_eq!(t.col_count(), 3);
        assert_eq!(t.rows[0].cells[0].col_span, 2);
        assert!(ed.state_json().contains("\"focus\":[1,0,1]"));
        assert!(TableEditor::from_json("{").is_err());
    }
}
