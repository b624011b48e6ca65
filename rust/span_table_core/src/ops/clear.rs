//! Clearing the content of selected cells.

use std::collections::HashSet;

use super::{finish, targets_of};
use crate::doc::Node;
use crate::error::Result;
use crate::selection::TableState;
use crate::translate::absolute_path;
use crate::tree::{cell_at, table_at, Fragment, TreeEdit};

/// Reset every selected cell to a single empty paragraph, keeping the
/// selection. When the selection covers every cell of the table the whole
/// table is removed instead. Without a visible drag selection nothing happens:
/// a lone caret is left to ordinary text deletion.
pub fn clear_cells<T: TreeEdit + ?Sized>(tree: &mut T, state: &TableState) -> Result<TableState> {
    if !state.show_selection {
        tracing::debug!(selected = state.selection.len(), "no visible cell selection, nothing to clear");
        return Ok(state.clone());
    }
    let Some(targets) = targets_of(&state.selection)? else {
        tracing::debug!("clear without a selected cell, nothing to do");
        return Ok(state.clone());
    };
    let table = &targets.table;
    let distinct: HashSet<_> = targets.cells.iter().copied().collect();
    if distinct.len() == table_at(tree, table)?.cell_count() {
        tracing::debug!(%table, "whole table selected, removing it");
        tree.remove(table)?;
        return Ok(finish(tree, None));
    }

    for pos in distinct {
        let at = absolute_path(table, pos);
        let blocks = cell_at(tree, &at)?.children.len();
        for i in (0..blocks).rev() {
            tree.remove(&at.child(i))?;
        }
        tree.insert(&at.child(0), Fragment::Blocks(vec![Node::default()]))?;
    }
    Ok(state.clone())
}
