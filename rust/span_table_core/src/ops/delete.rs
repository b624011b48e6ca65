//! Row and column deletion.
//!
//! The deleted range is the bounding rectangle of the targets. Cells reaching
//! past it survive with shorter spans; a tall cell anchored inside deleted
//! rows is carried down into the first row that survives.

use super::{finish, project, prune_empty_rows, targets_of};
use crate::doc::TableRow;
use crate::error::Result;
use crate::grid::{CellPos, Coord};
use crate::path::NodePath;
use crate::range::bounding_rect;
use crate::selection::TableState;
use crate::translate::{absolute_path, next_insert_position};
use crate::tree::{Fragment, SpanProps, TreeEdit};

/// Delete every logical row touched by the targets.
pub fn delete_rows<T: TreeEdit + ?Sized>(tree: &mut T, state: &TableState) -> Result<TableState> {
    let Some(targets) = targets_of(&state.targets())? else {
        tracing::debug!("row delete without a target cell, nothing to do");
        return Ok(state.clone());
    };
    let table = &targets.table;
    let grid = project(tree, table)?;
    let Some(bounds) = bounding_rect(&grid, &targets.cells)? else { return Ok(state.clone()) };
    let (top, bottom) = (bounds.top, bounds.bottom);

    let doomed: Vec<usize> = (0..grid.physical_rows())
        .filter(|&r| grid.row_len(r) > 0 && grid.row_start(r).map_or(false, |s| (top..=bottom).contains(&s)))
        .collect();

    let mut shrunk: Vec<(CellPos, usize)> = Vec::new();
    // Cells to carry below the range, with their left column.
    let mut carried: Vec<(CellPos, usize)> = Vec::new();
    for (pos, entry) in grid.iter_cells() {
        let rect = entry.rect();
        let inside = rect.top >= top && rect.bottom <= bottom;
        if rect.bottom < top || rect.top > bottom || inside {
            continue;
        }
        let cut = rect.bottom.min(bottom) - rect.top.max(top) + 1;
        shrunk.push((pos, rect.height() - cut));
        if rect.top >= top {
            carried.push((pos, rect.left));
        }
    }
    tracing::debug!(%table, top, bottom, rows = doomed.len(), shrunk = shrunk.len(), carried = carried.len(), "deleting rows");

    for &(pos, row_span) in &shrunk {
        tree.set_properties(&absolute_path(table, pos), SpanProps::rows(row_span))?;
    }
    if !carried.is_empty() {
        let line = bottom + 1;
        let existing = grid.physical_row_on(line);
        let dest = match existing {
            Some(row) => row,
            None => {
                let at = grid.rows_before(line);
                tree.insert(&table.child(at), Fragment::Rows(vec![TableRow::default()]))?;
                at
            }
        };
        // Right to left: each move leaves the indices of the ones still queued alone.
        carried.sort_by(|a, b| b.1.cmp(&a.1));
        for (pos, left) in carried {
            let index = existing.map_or(0, |row| next_insert_position(&grid, row, left));
            tree.move_node(&absolute_path(table, pos), &table.child(dest).child(index))?;
        }
    }
    for &row in doomed.iter().rev() {
        tree.remove(&table.child(row))?;
    }

    let caret = caret_after(tree, table, Coord::new(top, bounds.left))?;
    Ok(finish(tree, caret))
}

/// Delete every logical column touched by the targets.
pub fn delete_cols<T: TreeEdit + ?Sized>(tree: &mut T, state: &TableState) -> Result<TableState> {
    let Some(targets) = targets_of(&state.targets())? else {
        tracing::debug!("column delete without a target cell, nothing to do");
        return Ok(state.clone());
    };
    let table = &targets.table;
    let grid = project(tree, table)?;
    let Some(bounds) = bounding_rect(&grid, &targets.cells)? else { return Ok(state.clone()) };
    let (left, right) = (bounds.left, bounds.right);

    let mut shrunk: Vec<(CellPos, usize)> = Vec::new();
    let mut removed: Vec<CellPos> = Vec::new();
    for (pos, entry) in grid.iter_cells() {
        let rect = entry.rect();
        if rect.right < left || rect.left > right {
            continue;
        }
        let cut = rect.right.min(right) - rect.left.max(left) + 1;
        if cut == rect.width() {
            removed.push(pos);
        } else {
            shrunk.push((pos, rect.width() - cut));
        }
    }
    tracing::debug!(%table, left, right, removed = removed.len(), shrunk = shrunk.len(), "deleting columns");

    for &(pos, col_span) in &shrunk {
        tree.set_properties(&absolute_path(table, pos), SpanProps::cols(col_span))?;
    }
    // Physical order, so reversing it removes the last cell of the last row first.
    for &pos in removed.iter().rev() {
        tree.remove(&absolute_path(table, pos))?;
    }

    let caret = caret_after(tree, table, Coord::new(bounds.top, left))?;
    Ok(finish(tree, caret))
}

/// Prune rows left empty, then find the cell nearest `near` in what remains.
fn caret_after<T: TreeEdit + ?Sized>(tree: &mut T, table: &NodePath, near: Coord) -> Result<Option<NodePath>> {
    let (_, table_removed) = prune_empty_rows(tree, table)?;
    if table_removed {
        return Ok(None);
    }
    let grid = project(tree, table)?;
    if grid.rows() == 0 || grid.cols() == 0 {
        return Ok(None);
    }
    let at = Coord::new(near.row.min(grid.rows() - 1), near.col.min(grid.cols() - 1));
    Ok(grid.owner_at(at).ok().map(|pos| absolute_path(table, pos)))
}
