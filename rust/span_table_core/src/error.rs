//! Error type shared by the grid, the translators and the table operations.

use crate::grid::CellPos;
use crate::path::NodePath;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A logical coordinate outside the projected grid was requested.
    #[error("logical coordinate ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfRange { row: usize, col: usize, rows: usize, cols: usize },

    /// Two physical cells claim the same logical coordinate.
    #[error("cells {first} and {second} both claim logical coordinate ({row}, {col})")]
    Overlap { row: usize, col: usize, first: CellPos, second: CellPos },

    /// A coordinate inside the grid bounds that no physical cell covers.
    #[error("logical coordinate ({row}, {col}) is not covered by any cell")]
    Uncovered { row: usize, col: usize },

    /// A span reaching past the first row's width or the largest projectable grid.
    #[error("cell {pos} spans {row_span}x{col_span}, past the table's extent")]
    SpanOutOfBounds { pos: CellPos, row_span: usize, col_span: usize },

    /// A physical cell position that does not exist in the table.
    #[error("no cell at {0}")]
    NoSuchCell(CellPos),

    #[error("no node at path {0}")]
    InvalidPath(NodePath),

    #[error("node at {0} is not a table")]
    NotATable(NodePath),

    #[error("cell path {path} does not address a cell of table {table}")]
    ForeignCell { path: NodePath, table: NodePath },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;
