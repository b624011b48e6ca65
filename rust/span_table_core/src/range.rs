//! Rectangular selection over a table with merged cells.
//!
//! A drag from one cell to another selects the smallest logical rectangle
//! containing both, grown until no merged cell straddles its edge.

use std::collections::HashSet;

use crate::error::Result;
use crate::grid::{CellPos, Coord, LogicalGrid, Rect};
use crate::path::NodePath;
use crate::selection::TableState;
use crate::translate::{absolute_path, relative_path, table_of};
use crate::tree::{table_at, TreeEdit};

/// Bounding rectangle of the logical rectangles of `cells`.
pub fn bounding_rect(grid: &LogicalGrid, cells: &[CellPos]) -> Result<Option<Rect>> {
    let mut bounds: Option<Rect> = None;
    for &pos in cells {
        let rect = grid.rect_of(pos)?;
        bounds = Some(bounds.map_or(rect, |b| b.union(&rect)));
    }
    Ok(bounds)
}

/// Grow `rect` until every merged cell touching it lies fully inside.
pub fn expand(grid: &LogicalGrid, mut rect: Rect) -> Result<Rect> {
    'scan: loop {
        for at in rect.coords() {
            let span = grid.entry_at(at)?.rect();
            if !rect.contains_rect(&span) {
                rect = rect.union(&span);
                continue 'scan;
            }
        }
        return Ok(rect);
    }
}

/// Distinct physical cells lying entirely inside `rect`, in row-major scan order.
pub fn cells_in(grid: &LogicalGrid, rect: &Rect) -> Result<Vec<CellPos>> {
    let mut seen = HashSet::new();
    let mut cells = Vec::new();
    for at in rect.coords() {
        let slot = grid.slot(at)?;
        if rect.contains_rect(&slot.entry.rect()) && seen.insert(slot.owner) {
            cells.push(slot.owner);
        }
    }
    Ok(cells)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub rect: Rect,
    pub cells: Vec<CellPos>,
}

/// Resolve a drag from `anchor` to `focus` into a merge-respecting rectangle.
pub fn resolve(grid: &LogicalGrid, anchor: CellPos, focus: CellPos) -> Result<Resolved> {
    let start = grid.rect_of(anchor)?;
    let rect = expand(grid, start.union(&grid.rect_of(focus)?))?;
    let cells = cells_in(grid, &rect)?;
    Ok(Resolved { rect, cells })
}

/// Physical cells at the top-left and bottom-right corners of the
/// selection's bounding rectangle, for positioning a selection overlay.
pub fn selection_corners(grid: &LogicalGrid, cells: &[CellPos]) -> Result<Option<(CellPos, CellPos)>> {
    let Some(rect) = bounding_rect(grid, cells)? else { return Ok(None) };
    let top_left = grid.owner_at(Coord::new(rect.top, rect.left))?;
    let bottom_right = grid.owner_at(Coord::new(rect.bottom, rect.right))?;
    Ok(Some((top_left, bottom_right)))
}

/// Tree-level drag selection: both endpoints are cell paths of the same
/// table. The returned state selects every resolved cell and keeps the
/// caret on the anchor.
pub fn select_cells<T: TreeEdit + ?Sized>(tree: &T, anchor: &NodePath, focus: &NodePath) -> Result<TableState> {
    let table_path = table_of(anchor)?;
    let grid = LogicalGrid::project(table_at(tree, &table_path)?)?;
    let resolved = resolve(&grid, relative_path(anchor, &table_path)?, relative_path(focus, &table_path)?)?;
    tracing::debug!(table = %table_path, rect = ?resolved.rect, cells = resolved.cells.len(), "resolved table selection");
    let selection: Vec<NodePath> = resolved.cells.iter().map(|&p| absolute_path(&table_path, p)).collect();
    Ok(TableState { show_selection: selection.len() > 1, selection, focus: Some(anchor.clone()) })
}
