//! Structural table operations.
//!
//! Every operation projects the current table, plans its edits in logical
//! coordinates and replays them through [`TreeEdit`]. Replay order is part of
//! each operation's contract because the tree API does not rewrite paths
//! queued before an edit: removals run from the highest index down, and
//! inserts that shift rows run before anything that addresses those rows by
//! their old index is no longer needed.

pub mod clear;
pub mod delete;
pub mod insert;
pub mod merge;
pub mod split;

pub use clear::clear_cells;
pub use delete::{delete_cols, delete_rows};
pub use insert::{insert_line, Direction};
pub use merge::merge_cells;
pub use split::split_cells;

use crate::doc::TableCell;
use crate::error::Result;
use crate::grid::{CellPos, LogicalGrid};
use crate::path::NodePath;
use crate::selection::TableState;
use crate::translate::{relative_path, table_of};
use crate::tree::{table_at, TreeEdit};

/// Cells an operation acts on, relative to their table.
pub(crate) struct Targets {
    pub table: NodePath,
    pub cells: Vec<CellPos>,
}

/// Relative positions of `paths`, all of which must belong to the table of
/// the first one. `None` for an empty list.
pub(crate) fn targets_of(paths: &[NodePath]) -> Result<Option<Targets>> {
    let Some(first) = paths.first() else { return Ok(None) };
    let table = table_of(first)?;
    let cells = paths.iter().map(|p| relative_path(p, &table)).collect::<Result<Vec<_>>>()?;
    Ok(Some(Targets { table, cells }))
}

pub(crate) fn project<T: TreeEdit + ?Sized>(tree: &T, table: &NodePath) -> Result<LogicalGrid> {
    LogicalGrid::project(table_at(tree, table)?)
}

pub(crate) fn empty_cells(count: usize) -> Vec<TableCell> {
    (0..count).map(|_| TableCell::empty()).collect()
}

/// Move the caret and hand back a state without a drag selection.
pub(crate) fn finish<T: TreeEdit + ?Sized>(tree: &mut T, caret: Option<NodePath>) -> TableState {
    tree.select(caret.clone());
    TableState { selection: Vec::new(), show_selection: false, focus: caret }
}

/// Remove every row without cells, last first, then the table itself if no
/// row is left. Returns the removed row indices in ascending order and
/// whether the table went too.
pub(crate) fn prune_empty_rows<T: TreeEdit + ?Sized>(tree: &mut T, table: &NodePath) -> Result<(Vec<usize>, bool)> {
    let t = table_at(tree, table)?;
    let empty: Vec<usize> = t.rows.iter().enumerate().filter(|(_, r)| r.cells.is_empty()).map(|(i, _)| i).collect();
    let remaining = t.rows.len() - empty.len();
    for &row in empty.iter().rev() {
        tree.remove(&table.child(row))?;
    }
    if remaining == 0 {
        tracing::debug!(%table, "table has no rows left, removing it");
        tree.remove(table)?;
        return Ok((empty, true));
    }
    Ok((empty, false))
}
