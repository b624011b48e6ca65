//! Projection of the physical row/cell tree onto a dense logical grid.
//!
//! Rows in the physical table can hold fewer cells than there are logical
//! columns: a cell with `rowSpan > 1` occupies coordinates in later rows
//! without those rows storing anything for it. [`LogicalGrid::project`]
//! replays the spans to recover which physical cell owns every logical
//! coordinate. The grid is rebuilt for every operation and never cached.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::doc::Table;
use crate::error::{Result, TableError};

/// Position of a physical cell relative to its table: row index, then index
/// of the cell inside that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub cell: usize,
}

impl CellPos {
    pub fn new(row: usize, cell: usize) -> Self { Self { row, cell } }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.cell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self { Self { row, col } }
}

/// Inclusive logical rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Rect {
    pub fn new(top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self { top, left, bottom, right }
    }

    pub fn unit(at: Coord) -> Self {
        Self::new(at.row, at.col, at.row, at.col)
    }

    pub fn height(&self) -> usize { self.bottom - self.top + 1 }
    pub fn width(&self) -> usize { self.right - self.left + 1 }
    pub fn area(&self) -> usize { self.height() * self.width() }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.top >= self.top && other.bottom <= self.bottom && other.left >= self.left && other.right <= self.right
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.top.min(other.top),
            self.left.min(other.left),
            self.bottom.max(other.bottom),
            self.right.max(other.right),
        )
    }

    /// Row-major walk over every coordinate.
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        (self.top..=self.bottom).flat_map(move |row| (self.left..=self.right).map(move |col| Coord::new(row, col)))
    }
}

/// What a logical coordinate resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridEntry {
    /// Sole owner of this coordinate.
    Unit(Coord),
    /// Part of a merged cell covering the whole rectangle.
    Span(Rect),
}

impl GridEntry {
    pub fn rect(&self) -> Rect {
        match *self {
            GridEntry::Unit(at) => Rect::unit(at),
            GridEntry::Span(rect) => rect,
        }
    }

    pub fn is_span(&self) -> bool {
        matches!(self, GridEntry::Span(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub entry: GridEntry,
    pub owner: CellPos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalGrid {
    rows: usize,
    cols: usize,
    /// Row-major, `rows * cols`; `None` only for malformed tables.
    slots: Vec<Option<Slot>>,
    /// Entry of every physical cell, indexed like the table.
    cells: Vec<Vec<GridEntry>>,
    /// Logical row each physical row starts on.
    row_starts: Vec<usize>,
}

/// Largest logical grid a table may project to.
pub const MAX_SLOTS: usize = 1 << 20;

/// Claims grow downwards as tall spans are met, so rows are added lazily.
struct Claims {
    cols: usize,
    slots: Vec<Option<Slot>>,
}

impl Claims {
    fn get(&self, row: usize, col: usize) -> Option<&Slot> {
        if col >= self.cols { return None; }
        self.slots.get(row * self.cols + col).and_then(Option::as_ref)
    }

    fn is_claimed(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }

    fn claim(&mut self, at: Coord, slot: Slot) -> Result<()> {
        let idx = at.row * self.cols + at.col;
        if idx >= self.slots.len() {
            self.slots.resize((at.row + 1) * self.cols, None);
        }
        if let Some(prev) = &self.slots[idx] {
            return Err(TableError::Overlap { row: at.row, col: at.col, first: prev.owner, second: slot.owner });
        }
        self.slots[idx] = Some(slot);
        Ok(())
    }

    /// Rectangle of a `rs x cs` cell placed at (`row`, `col`), if it stays
    /// inside the columns and the slot budget.
    fn fit(&self, row: usize, col: usize, rs: usize, cs: usize) -> Option<Rect> {
        let right = col.checked_add(cs).filter(|&end| end <= self.cols)? - 1;
        let bottom = row.checked_add(rs)?;
        bottom.checked_mul(self.cols).filter(|&area| area <= MAX_SLOTS)?;
        Some(Rect::new(row, col, bottom - 1, right))
    }

    /// First logical row at or after `from` with any free column.
    fn first_open_row(&self, from: usize) -> usize {
        let mut row = from;
        while (0..self.cols).all(|col| self.is_claimed(row, col)) {
            row += 1;
        }
        row
    }
}

impl LogicalGrid {
    /// Build the grid for `table`. Fails when two cells claim the same
    /// coordinate, or when a span runs past the first row's width or would
    /// need more than [`MAX_SLOTS`] coordinates.
    pub fn project(table: &Table) -> Result<Self> {
        let mut claims = Claims { cols: table.col_count(), slots: Vec::new() };
        let mut cells = Vec::with_capacity(table.rows.len());
        let mut row_starts = Vec::with_capacity(table.rows.len());
        let mut row_index = 0;

        for (r, row) in table.rows.iter().enumerate() {
            if claims.cols > 0 {
                row_index = claims.first_open_row(row_index);
            }
            row_starts.push(row_index);

            let mut col = 0;
            let mut entries = Vec::with_capacity(row.cells.len());
            for (i, cell) in row.cells.iter().enumerate() {
                while claims.is_claimed(row_index, col) {
                    col += 1;
                }
                let (rs, cs) = (cell.row_span(), cell.col_span());
                let pos = CellPos::new(r, i);
                let rect = claims
                    .fit(row_index, col, rs, cs)
                    .ok_or(TableError::SpanOutOfBounds { pos, row_span: rs, col_span: cs })?;
                let entry = if rs == 1 && cs == 1 { GridEntry::Unit(Coord::new(row_index, col)) } else { GridEntry::Span(rect) };
                let slot = Slot { entry, owner: pos };
                for at in entry.rect().coords() {
                    claims.claim(at, slot)?;
                }
                entries.push(entry);
                col += cs;
            }
            cells.push(entries);
        }

        let cols = claims.cols;
        let rows = if cols == 0 { 0 } else { claims.slots.len() / cols };
        let mut slots = claims.slots;
        slots.resize(rows * cols, None);
        Ok(Self { rows, cols, slots, cells, row_starts })
    }

    /// Logical row count.
    pub fn rows(&self) -> usize { self.rows }
    /// Logical column count.
    pub fn cols(&self) -> usize { self.cols }
    pub fn physical_rows(&self) -> usize { self.cells.len() }

    fn check(&self, at: Coord) -> Result<usize> {
        if at.row >= self.rows || at.col >= self.cols {
            return Err(TableError::OutOfRange { row: at.row, col: at.col, rows: self.rows, cols: self.cols });
        }
        Ok(at.row * self.cols + at.col)
    }

    pub fn slot(&self, at: Coord) -> Result<&Slot> {
        let idx = self.check(at)?;
        self.slots[idx].as_ref().ok_or(TableError::Uncovered { row: at.row, col: at.col })
    }

    pub fn entry_at(&self, at: Coord) -> Result<GridEntry> {
        self.slot(at).map(|s| s.entry)
    }

    pub fn owner_at(&self, at: Coord) -> Result<CellPos> {
        self.slot(at).map(|s| s.owner)
    }

    /// Entry of the physical cell at `pos`.
    pub fn entry_of(&self, pos: CellPos) -> Result<GridEntry> {
        self.cells.get(pos.row).and_then(|r| r.get(pos.cell)).copied().ok_or(TableError::NoSuchCell(pos))
    }

    pub fn rect_of(&self, pos: CellPos) -> Result<Rect> {
        self.entry_of(pos).map(|e| e.rect())
    }

    /// Logical row the physical row starts on. For a row without cells this is
    /// where the row search stopped, which carries no meaning for placement.
    pub fn row_start(&self, row: usize) -> Option<usize> {
        self.row_starts.get(row).copied()
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.cells.get(row).map_or(0, Vec::len)
    }

    /// Physical row that starts on logical row `line`, if any.
    pub fn physical_row_on(&self, line: usize) -> Option<usize> {
        (0..self.cells.len()).find(|&r| self.row_len(r) > 0 && self.row_starts[r] == line)
    }

    /// Number of non-empty physical rows starting above `line`: the index a
    /// new physical row for `line` is inserted at.
    pub fn rows_before(&self, line: usize) -> usize {
        (0..self.cells.len()).take_while(|&r| self.row_len(r) == 0 || self.row_starts[r] < line).count()
    }

    /// Every physical cell with its entry, in physical order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellPos, GridEntry)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(i, e)| (CellPos::new(r, i), *e)))
    }

    /// Check that every coordinate is covered. Overlaps are already rejected
    /// by [`LogicalGrid::project`].
    pub fn check_dense(&self) -> Result<()> {
        match self.slots.iter().position(Option::is_none) {
            Some(idx) => Err(TableError::Uncovered { row: idx / self.cols, col: idx % self.cols }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::table;

    #[test]
    fn plain_table_is_all_units() {
        let g = LogicalGrid::project(&Table::new(2, 3)).unwrap();
        assert_eq!((g.rows(), g.cols()), (2, 3));
        assert_eq!(g.entry_at(Coord::new(1, 2)).unwrap(), GridEntry::Unit(Coord::new(1, 2)));
        assert_eq!(g.owner_at(Coord::new(1, 2)).unwrap(), CellPos::new(1, 2));
        g.check_dense().unwrap();
    }

    #[test]
    fn spans_carry_into_later_rows() {
        // A(2x1) B C
        //   .    D(1x2)
        //  E     F  G
        let t = table(&[&[(2, 1), (1, 1), (1, 1)], &[(1, 2)], &[(1, 1), (1, 1), (1, 1)]]);
        let g = LogicalGrid::project(&t).unwrap();
        g.check_dense().unwrap();
        assert_eq!(g.rect_of(CellPos::new(1, 0)).unwrap(), Rect::new(1, 1, 1, 2));
        assert_eq!(g.owner_at(Coord::new(1, 0)).unwrap(), CellPos::new(0, 0));
        assert_eq!(g.entry_at(Coord::new(1, 0)).unwrap(), GridEntry::Span(Rect::new(0, 0, 1, 0)));
        assert_eq!(g.row_start(2), Some(2));
    }

    #[test]
    fn fully_covered_row_pushes_next_row_down() {
        // A single row of two tall cells covers two logical rows.
        let t = table(&[&[(2, 1), (2, 1)], &[(1, 1), (1, 1)]]);
        let g = LogicalGrid::project(&t).unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.row_start(1), Some(2));
        assert_eq!(g.physical_row_on(1), None);
        assert_eq!(g.rows_before(1), 1);
        g.check_dense().unwrap();
    }

    #[test]
    fn overlap_is_reported_with_owners() {
        // The tall cell in row 0 runs into the wide cell of row 1.
        let t = table(&[&[(1, 1), (2, 1)], &[(1, 2)]]);
        match LogicalGrid::project(&t) {
            Err(TableError::Overlap { row, col, first, second }) => {
                assert_eq!((row, col), (1, 1));
                assert_eq!(first, CellPos::new(0, 1));
                assert_eq!(second, CellPos::new(1, 0));
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn spans_past_the_table_are_rejected() {
        let huge = table(&[&[(1, usize::MAX), (1, 2)]]);
        assert!(matches!(
            LogicalGrid::project(&huge),
            Err(TableError::SpanOutOfBounds { pos: CellPos { row: 0, cell: 0 }, .. })
        ));

        // Wider than the first row.
        let wide = table(&[&[(1, 1), (1, 1)], &[(1, 3)]]);
        assert!(matches!(
            LogicalGrid::project(&wide),
            Err(TableError::SpanOutOfBounds { pos: CellPos { row: 1, cell: 0 }, row_span: 1, col_span: 3 })
        ));

        let tall = table(&[&[(usize::MAX, 1), (1, 1)]]);
        assert!(matches!(LogicalGrid::project(&tall), Err(TableError::SpanOutOfBounds { .. })));
        let deep = table(&[&[(MAX_SLOTS, 2)]]);
        assert!(matches!(LogicalGrid::project(&deep), Err(TableError::SpanOutOfBounds { .. })));
    }

    #[test]
    fn short_rows_leave_gaps() {
        let t = table(&[&[(1, 1), (1, 1)], &[(1, 1)]]);
        let g = LogicalGrid::project(&t).unwrap();
        assert!(matches!(g.check_dense(), Err(TableError::Uncovered { row: 1, col: 1 })));
        assert!(matches!(g.owner_at(Coord::new(1, 1)), Err(TableError::Uncovered { .. })));
        assert!(matches!(g.owner_at(Coord::new(2, 0)), Err(TableError::OutOfRange { .. })));
    }

    #[test]
    fn empty_table() {
        let g = LogicalGrid::project(&Table::default()).unwrap();
        assert_eq!((g.rows(), g.cols(), g.physical_rows()), (0, 0, 0));
    }
}
