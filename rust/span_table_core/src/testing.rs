//! Fixtures shared by the unit tests.

use crate::doc::{Doc, Node, Table, TableCell, TableRow};
use crate::grid::{CellPos, LogicalGrid};
use crate::path::NodePath;
use crate::selection::TableState;

/// Table from per-row `(rowSpan, colSpan)` lists.
pub fn table(rows: &[&[(usize, usize)]]) -> Table {
    Table {
        rows: rows
            .iter()
            .map(|cells| TableRow::new(cells.iter().map(|&(rs, cs)| TableCell::spanning(rs, cs)).collect()))
            .collect(),
    }
}

/// Document with a paragraph at index 0 and `table` at index 1.
pub fn doc_with(table: Table) -> Doc {
    Doc::new(vec![Node::paragraph("before"), Node::Table(table)])
}

pub fn table_path() -> NodePath {
    NodePath::from([1])
}

pub fn cell(row: usize, cell: usize) -> NodePath {
    NodePath::from([1, row, cell])
}

pub fn focus(row: usize, c: usize) -> TableState {
    TableState::focused(cell(row, c))
}

pub fn selecting(cells: &[(usize, usize)]) -> TableState {
    TableState::selecting(cells.iter().map(|&(r, c)| cell(r, c)).collect())
}

/// `(rowSpan, colSpan)` of every cell, per row.
pub fn spans(doc: &Doc) -> Vec<Vec<(usize, usize)>> {
    doc.table(1)
        .map(|t| t.rows.iter().map(|r| r.cells.iter().map(|c| (c.row_span, c.col_span)).collect()).collect())
        .unwrap_or_default()
}

pub fn grid(doc: &Doc) -> LogicalGrid {
    let grid = LogicalGrid::project(doc.table(1).expect("table at [1]")).expect("projectable table");
    grid.check_dense().expect("dense grid");
    grid
}

/// Text of the first paragraph of the cell at `pos`.
pub fn text(doc: &Doc, pos: CellPos) -> String {
    match doc.table(1).and_then(|t| t.cell(pos.row, pos.cell)).and_then(|c| c.children.first()) {
        Some(Node::Paragraph { text, .. }) => text.clone(),
        _ => String::new(),
    }
}
