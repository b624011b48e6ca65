//! Splitting merged cells back into unit cells.

use super::{empty_cells, finish, project, targets_of};
use crate::doc::TableRow;
use crate::error::{Result, TableError};
use crate::grid::CellPos;
use crate::path::NodePath;
use crate::selection::TableState;
use crate::translate::{absolute_path, next_insert_position};
use crate::tree::{Fragment, SpanProps, TreeEdit};

/// Split every merged target into unit cells. The original cell keeps its
/// content on the top-left coordinate; every other coordinate gets an empty
/// cell.
pub fn split_cells<T: TreeEdit + ?Sized>(tree: &mut T, state: &TableState) -> Result<TableState> {
    let Some(mut targets) = targets_of(&state.targets())? else {
        tracing::debug!("split without a target cell, nothing to do");
        return Ok(state.clone());
    };
    // Later cells first: splitting never moves cells that precede it.
    targets.cells.sort_unstable();
    targets.cells.dedup();
    for &pos in targets.cells.iter().rev() {
        split_one(tree, &targets.table, pos)?;
    }
    let caret = targets.cells.first().map(|&pos| absolute_path(&targets.table, pos));
    Ok(finish(tree, caret))
}

fn split_one<T: TreeEdit + ?Sized>(tree: &mut T, table: &NodePath, pos: CellPos) -> Result<()> {
    let grid = project(tree, table)?;
    let rect = grid.rect_of(pos)?;
    if rect.height() == 1 && rect.width() == 1 {
        return Ok(());
    }
    let lower = rect.top + 1..=rect.bottom;
    let missing: Vec<usize> = lower.clone().filter(|&line| grid.physical_row_on(line).is_none()).collect();
    tracing::debug!(%table, %pos, ?rect, synthetic = missing.len(), "splitting cell");

    // (row index once the synthetic rows are in, cell index)
    let mut fills: Vec<(usize, usize)> = Vec::new();
    for line in lower {
        let shift = missing.iter().filter(|&&m| m < line).count();
        let fill = match grid.physical_row_on(line) {
            Some(row) => (row + shift, next_insert_position(&grid, row, rect.left)),
            None => (grid.rows_before(line) + shift, 0),
        };
        fills.push(fill);
    }

    for &line in missing.iter().rev() {
        tree.insert(&table.child(grid.rows_before(line)), Fragment::Rows(vec![TableRow::default()]))?;
    }
    let at = absolute_path(table, pos);
    tree.set_properties(&at, SpanProps::both(1, 1))?;
    if rect.width() > 1 {
        let after = at.next().ok_or_else(|| TableError::InvalidPath(at.clone()))?;
        tree.insert(&after, Fragment::Cells(empty_cells(rect.width() - 1)))?;
    }
    for (row, cell) in fills {
        tree.insert(&table.child(row).child(cell), Fragment::Cells(empty_cells(rect.width())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::TableCell;
    use crate::grid::Coord;
    use crate::testing::{cell, doc_with, focus, grid, selecting, spans, table, text};
    use pretty_assertions::assert_eq;

    #[test]
    fn split_wide_cell() {
        let mut doc = doc_with(table(&[&[(1, 3)], &[(1, 1), (1, 1), (1, 1)]]));
        let state = split_cells(&mut doc, &focus(0, 0)).unwrap();
        assert_eq!(spans(&doc), vec![vec![(1, 1); 3], vec![(1, 1); 3]]);
        assert_eq!(state.focus, Some(cell(0, 0)));
    }

    #[test]
    fn split_block_keeps_content_top_left() {
        // A  B(2x2)
        // C    .
        let mut t = table(&[&[(1, 1), (2, 2)], &[(1, 1)]]);
        t.rows[0].cells[1] = TableCell { row_span: 2, col_span: 2, ..TableCell::text("B") };
        let mut doc = doc_with(t);
        split_cells(&mut doc, &focus(0, 1)).unwrap();
        assert_eq!(spans(&doc), vec![vec![(1, 1); 3], vec![(1, 1); 3]]);
        let g = grid(&doc);
        assert_eq!(text(&doc, g.owner_at(Coord::new(0, 1)).unwrap()), "B");
        assert_eq!(text(&doc, g.owner_at(Coord::new(1, 2)).unwrap()), "");
    }

    #[test]
    fn split_inserts_after_cells_left_of_the_span() {
        // A  B(2x1) C
        // D    .    E
        let mut t = table(&[&[(1, 1), (2, 1), (1, 1)], &[(1, 1), (1, 1)]]);
        t.rows[1].cells[1] = TableCell::text("E");
        let mut doc = doc_with(t);
        split_cells(&mut doc, &focus(0, 1)).unwrap();
        let g = grid(&doc);
        assert_eq!(spans(&doc)[1].len(), 3);
        assert_eq!(g.owner_at(Coord::new(1, 1)).unwrap(), CellPos::new(1, 1));
        assert_eq!(text(&doc, CellPos::new(1, 2)), "E");
    }

    #[test]
    fn split_fills_fully_covered_lines_with_new_rows() {
        // A(2x1) B(2x1)
        // C      D
        let mut doc = doc_with(table(&[&[(2, 1), (2, 1)], &[(1, 1), (1, 1)]]));
        split_cells(&mut doc, &focus(0, 1)).unwrap();
        assert_eq!(spans(&doc), vec![vec![(2, 1), (1, 1)], vec![(1, 1)], vec![(1, 1), (1, 1)]]);
        let g = grid(&doc);
        assert_eq!(g.owner_at(Coord::new(1, 1)).unwrap(), CellPos::new(1, 0));
    }

    #[test]
    fn split_several_targets() {
        let mut doc = doc_with(table(&[&[(1, 2), (1, 2)], &[(1, 1), (1, 1), (1, 1), (1, 1)]]));
        let state = split_cells(&mut doc, &selecting(&[(0, 0), (0, 1)])).unwrap();
        assert_eq!(spans(&doc), vec![vec![(1, 1); 4], vec![(1, 1); 4]]);
        assert_eq!(state.focus, Some(cell(0, 0)));
        assert_eq!(doc.caret, Some(cell(0, 0)));
    }

    #[test]
    fn selection_order_does_not_matter() {
        // A(2x1) B C
        //   .    D(1x2)
        let mut doc = doc_with(table(&[&[(2, 1), (1, 1), (1, 1)], &[(1, 2)]]));
        let state = split_cells(&mut doc, &selecting(&[(1, 0), (0, 0)])).unwrap();
        assert_eq!(spans(&doc), vec![vec![(1, 1); 3], vec![(1, 1); 3]]);
        assert_eq!(state.focus, Some(cell(0, 0)));
    }

    #[test]
    fn unmerged_target_is_left_alone() {
        let mut doc = doc_with(table(&[&[(1, 1), (1, 1)]]));
        split_cells(&mut doc, &focus(0, 1)).unwrap();
        assert_eq!(spans(&doc), vec![vec![(1, 1), (1, 1)]]);
    }
}
