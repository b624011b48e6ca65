//! Row and column insertion.
//!
//! The new line goes in at a logical boundary next to the target cell. Cells
//! straddling that boundary are stretched over the new line instead of being
//! cut; every other coordinate on the new line gets a fresh empty cell.

use serde::{Deserialize, Serialize};

use super::{empty_cells, finish, project, targets_of};
use crate::doc::TableRow;
use crate::error::Result;
use crate::grid::{CellPos, Coord, LogicalGrid};
use crate::path::NodePath;
use crate::selection::TableState;
use crate::translate::{absolute_path, next_insert_position};
use crate::tree::{Fragment, SpanProps, TreeEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
    Left,
    Right,
}

impl Direction {
    /// Above/Left insert before the first target, Below/Right after the last.
    fn is_before(self) -> bool {
        matches!(self, Direction::Above | Direction::Left)
    }
}

/// Insert one row or column next to the state's targets.
pub fn insert_line<T: TreeEdit + ?Sized>(tree: &mut T, state: &TableState, direction: Direction) -> Result<TableState> {
    let Some(targets) = targets_of(&state.targets())? else {
        tracing::debug!(?direction, "insert without a target cell, nothing to do");
        return Ok(state.clone());
    };
    let grid = project(tree, &targets.table)?;
    let pos = if direction.is_before() { targets.cells[0] } else { targets.cells[targets.cells.len() - 1] };
    let rect = grid.rect_of(pos)?;

    let caret = match direction {
        Direction::Above => insert_row(tree, &targets.table, &grid, rect.top)?,
        Direction::Below => insert_row(tree, &targets.table, &grid, rect.bottom + 1)?,
        Direction::Left => insert_col(tree, &targets.table, &grid, rect.left)?,
        Direction::Right => insert_col(tree, &targets.table, &grid, rect.right + 1)?,
    };
    Ok(finish(tree, caret))
}

/// New logical row between lines `line - 1` and `line`.
fn insert_row<T: TreeEdit + ?Sized>(tree: &mut T, table: &NodePath, grid: &LogicalGrid, line: usize) -> Result<Option<NodePath>> {
    let mut stretched: Vec<CellPos> = Vec::new();
    let mut fresh = 0;
    // On the outer edges nothing can straddle the new row.
    let inner = line > 0 && line < grid.rows();
    for col in 0..grid.cols() {
        let slot = if inner { Some(grid.slot(Coord::new(line, col))?) } else { None };
        match slot {
            Some(slot) if slot.entry.rect().top < line => {
                if !stretched.contains(&slot.owner) {
                    stretched.push(slot.owner);
                }
            }
            _ => fresh += 1,
        }
    }

    for &pos in &stretched {
        let height = grid.rect_of(pos)?.height();
        tree.set_properties(&absolute_path(table, pos), SpanProps::rows(height + 1))?;
    }
    let at = grid.rows_before(line);
    tracing::debug!(%table, line, at, fresh, stretched = stretched.len(), "inserting row");
    if fresh == 0 {
        // Every column is covered by a stretched cell; the new line needs no row of its own.
        return Ok(stretched.first().map(|&pos| absolute_path(table, pos)));
    }
    let row_path = table.child(at);
    tree.insert(&row_path, Fragment::Rows(vec![TableRow::new(empty_cells(fresh))]))?;
    Ok(Some(row_path.child(0)))
}

/// New logical column between columns `boundary - 1` and `boundary`.
fn insert_col<T: TreeEdit + ?Sized>(tree: &mut T, table: &NodePath, grid: &LogicalGrid, boundary: usize) -> Result<Option<NodePath>> {
    let inner = boundary > 0 && boundary < grid.cols();
    let mut stretched: Vec<CellPos> = Vec::new();
    // (physical row, cell index) for rows that take a new cell.
    let mut in_rows: Vec<(usize, usize)> = Vec::new();
    // Logical rows without a physical row of their own.
    let mut orphan_lines: Vec<usize> = Vec::new();
    let mut first_line = None;

    for line in 0..grid.rows() {
        if inner {
            let slot = grid.slot(Coord::new(line, boundary))?;
            if slot.entry.rect().left < boundary {
                if !stretched.contains(&slot.owner) {
                    stretched.push(slot.owner);
                }
                continue;
            }
        }
        first_line.get_or_insert(line);
        match grid.physical_row_on(line) {
            Some(row) => in_rows.push((row, next_insert_position(grid, row, boundary))),
            None => orphan_lines.push(line),
        }
    }
    tracing::debug!(
        %table,
        boundary,
        rows = in_rows.len(),
        synthetic = orphan_lines.len(),
        stretched = stretched.len(),
        "inserting column"
    );

    for &pos in &stretched {
        let width = grid.rect_of(pos)?.width();
        tree.set_properties(&absolute_path(table, pos), SpanProps::cols(width + 1))?;
    }
    for &(row, cell) in in_rows.iter().rev() {
        tree.insert(&table.child(row).child(cell), Fragment::Cells(empty_cells(1)))?;
    }
    // Descending, so rows inserted at the same index end up in line order.
    for &line in orphan_lines.iter().rev() {
        let row = TableRow::new(empty_cells(1));
        tree.insert(&table.child(grid.rows_before(line)), Fragment::Rows(vec![row]))?;
    }

    let Some(line) = first_line else {
        return Ok(stretched.first().map(|&pos| absolute_path(table, pos)));
    };
    let grid = project(tree, table)?;
    Ok(Some(absolute_path(table, grid.owner_at(Coord::new(line, boundary))?)))
}
