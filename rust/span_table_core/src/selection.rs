//! Table selection state, passed into and returned from every table operation.

use serde::{Deserialize, Serialize};

use crate::path::NodePath;
use crate::tree::{NodeRef, TreeEdit};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    /// Cells covered by a drag selection, in row-major logical order.
    #[serde(default)]
    pub selection: Vec<NodePath>,
    /// Whether the selection overlay is shown (more than one cell dragged).
    #[serde(default)]
    pub show_selection: bool,
    /// Cell holding the caret.
    #[serde(default)]
    pub focus: Option<NodePath>,
}

impl TableState {
    pub fn focused(cell: NodePath) -> Self {
        Self { selection: Vec::new(), show_selection: false, focus: Some(cell) }
    }

    pub fn selecting(cells: Vec<NodePath>) -> Self {
        let focus = cells.first().cloned();
        Self { show_selection: cells.len() > 1, selection: cells, focus }
    }

    /// Cells an operation acts on: the drag selection when it covers more than
    /// one cell, otherwise the focused cell.
    pub fn targets(&self) -> Vec<NodePath> {
        if self.selection.len() > 1 {
            return self.selection.clone();
        }
        self.focus.clone().or_else(|| self.selection.first().cloned()).into_iter().collect()
    }

    pub fn can_merge(&self) -> bool {
        self.selection.len() > 1
    }

    /// Whether any target cell is merged.
    pub fn can_split<T: TreeEdit + ?Sized>(&self, tree: &T) -> bool {
        self.targets()
            .iter()
            .any(|p| matches!(tree.node_at(p), Some(NodeRef::Cell(c)) if c.is_merged()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{cell, doc_with, table};

    #[test]
    fn targets_fall_back_to_focus() {
        let state = TableState::focused(cell(0, 1));
        assert_eq!(state.targets(), vec![cell(0, 1)]);
        assert!(!state.can_merge());

        let one = TableState { selection: vec![cell(1, 1)], show_selection: false, focus: Some(cell(0, 0)) };
        assert_eq!(one.targets(), vec![cell(0, 0)]);

        let many = TableState::selecting(vec![cell(0, 0), cell(0, 1)]);
        assert!(many.show_selection);
        assert!(many.can_merge());
        assert_eq!(many.targets().len(), 2);
        assert_eq!(TableState::default().targets(), Vec::<NodePath>::new());
    }

    #[test]
    fn can_split_needs_a_merged_target() {
        let doc = doc_with(table(&[&[(1, 2), (1, 1)], &[(1, 1), (1, 1), (1, 1)]]));
        assert!(TableState::focused(cell(0, 0)).can_split(&doc));
        assert!(!TableState::focused(cell(0, 1)).can_split(&doc));
        assert!(TableState::selecting(vec![cell(1, 0), cell(0, 0)]).can_split(&doc));
    }

    #[test]
    fn state_json() {
        let state: TableState = serde_json::from_str(r#"{"selection":[[1,0,0],[1,0,1]],"showSelection":true}"#).unwrap();
        assert_eq!(state.selection[1], cell(0, 1));
        assert!(state.focus.is_none());
    }
}
