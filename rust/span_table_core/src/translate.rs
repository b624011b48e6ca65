//! Conversions between physical cell paths and logical grid coordinates.

use crate::error::{Result, TableError};
use crate::grid::{CellPos, Coord, LogicalGrid, Rect};
use crate::path::NodePath;

/// Physical cell covering the logical coordinate `(row, col)`.
pub fn logical_to_physical(grid: &LogicalGrid, row: usize, col: usize) -> Result<CellPos> {
    grid.owner_at(Coord::new(row, col))
}

/// Logical rectangle owned by the physical cell at `pos`.
pub fn physical_to_logical_rect(grid: &LogicalGrid, pos: CellPos) -> Result<Rect> {
    grid.rect_of(pos)
}

/// `(row, cell)` of a cell path inside the table at `table`.
pub fn relative_path(cell: &NodePath, table: &NodePath) -> Result<CellPos> {
    match cell.relative_to(table) {
        Some(&[row, c]) => Ok(CellPos::new(row, c)),
        _ => Err(TableError::ForeignCell { path: cell.clone(), table: table.clone() }),
    }
}

pub fn absolute_path(table: &NodePath, pos: CellPos) -> NodePath {
    table.child(pos.row).child(pos.cell)
}

/// Table path for a cell path: its grandparent.
pub fn table_of(cell: &NodePath) -> Result<NodePath> {
    cell.parent()
        .and_then(|row| row.parent())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| TableError::InvalidPath(cell.clone()))
}

/// Cell index in physical row `row` at which a new cell lands on logical
/// column `col`: one past the last cell of that row anchored left of `col`.
///
/// Cells owned by other rows (tall spans reaching down) are skipped, which
/// is why this cannot be answered from the cell count alone.
pub fn next_insert_position(grid: &LogicalGrid, row: usize, col: usize) -> usize {
    if col == 0 || grid.row_len(row) == 0 {
        return 0;
    }
    let Some(line) = grid.row_start(row) else { return 0 };
    (0..col)
        .rev()
        .find_map(|c| grid.owner_at(Coord::new(line, c)).ok().filter(|owner| owner.row == row))
        .map_or(0, |owner| owner.cell + 1)
}
