//! Merging a rectangular selection into one spanning cell.

use super::{finish, project, prune_empty_rows, targets_of};
use crate::doc::{Node, TableCell};
use crate::error::Result;
use crate::grid::{CellPos, Coord};
use crate::range::bounding_rect;
use crate::selection::TableState;
use crate::translate::absolute_path;
use crate::tree::{cell_at, Fragment, NodeRef, TreeEdit};

/// Merge the selected cells into the cell owning the top-left corner of
/// their rectangle. Content of non-empty cells is kept in selection order.
///
/// Fewer than two cells, or cells that do not exactly tile their bounding
/// rectangle, leave the table untouched.
pub fn merge_cells<T: TreeEdit + ?Sized>(tree: &mut T, state: &TableState) -> Result<TableState> {
    if state.selection.len() < 2 {
        tracing::debug!(selected = state.selection.len(), "merge needs at least two cells");
        return Ok(state.clone());
    }
    let Some(targets) = targets_of(&state.selection)? else { return Ok(state.clone()) };
    let table = &targets.table;
    let grid = project(tree, table)?;

    let mut cells: Vec<CellPos> = Vec::with_capacity(targets.cells.len());
    for &pos in &targets.cells {
        if !cells.contains(&pos) {
            cells.push(pos);
        }
    }
    let Some(rect) = bounding_rect(&grid, &cells)? else { return Ok(state.clone()) };
    let mut covered = 0;
    for &pos in &cells {
        covered += grid.rect_of(pos)?.area();
    }
    // Cells never overlap, so matching areas means the rectangle is tiled.
    if covered != rect.area() {
        tracing::debug!(%table, ?rect, covered, "selection does not tile a rectangle, not merging");
        return Ok(state.clone());
    }
    let anchor = grid.owner_at(Coord::new(rect.top, rect.left))?;

    let mut children: Vec<Node> = Vec::new();
    for &pos in &cells {
        let cell = cell_at(tree, &absolute_path(table, pos))?;
        if !tree.is_empty(NodeRef::Cell(cell)) {
            children.extend(cell.children.iter().cloned());
        }
    }
    if children.is_empty() {
        children.push(Node::default());
    }
    let merged = TableCell { row_span: rect.height(), col_span: rect.width(), children };
    tracing::debug!(%table, ?rect, %anchor, cells = cells.len(), "merging cells");

    let mut others: Vec<CellPos> = cells.into_iter().filter(|&pos| pos != anchor).collect();
    others.sort_unstable();
    for &pos in others.iter().rev() {
        tree.remove(&absolute_path(table, pos))?;
    }
    let (pruned, _) = prune_empty_rows(tree, table)?;
    let row = anchor.row - pruned.iter().filter(|&&r| r < anchor.row).count();
    let at = absolute_path(table, CellPos::new(row, anchor.cell));
    tree.remove(&at)?;
    tree.insert(&at, Fragment::Cells(vec![merged]))?;

    Ok(finish(tree, Some(at)))
}
