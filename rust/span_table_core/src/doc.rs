//! Document tree structures and helpers.

use serde::{Deserialize, Serialize};

use crate::path::NodePath;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Doc {
    pub nodes: Vec<Node>,
    /// Cell holding the caret after the last table operation.
    #[serde(skip)]
    pub caret: Option<NodePath>,
}

impl Doc {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes, caret: None }
    }

    /// Insert a `rows x cols` table of empty cells at `at` (clamped to the end).
    pub fn insert_table(&mut self, at: usize, rows: usize, cols: usize) -> NodePath {
        let at = at.min(self.nodes.len());
        self.nodes.insert(at, Node::Table(Table::new(rows.max(1), cols.max(1))));
        NodePath::from([at])
    }

    /// Make sure the caret can always leave a table: a table that opens or
    /// closes the document, or sits right before another table, gets an empty
    /// paragraph next to it. Returns whether anything was inserted.
    pub fn pad_tables(&mut self) -> bool {
        let mut changed = false;
        let mut i = 0;
        while i < self.nodes.len() {
            if matches!(self.nodes[i], Node::Table(_)) {
                if i == 0 {
                    self.nodes.insert(0, Node::default());
                    changed = true;
                    i += 1;
                }
                let next_is_table = matches!(self.nodes.get(i + 1), Some(Node::Table(_)));
                if i + 1 == self.nodes.len() || next_is_table {
                    self.nodes.insert(i + 1, Node::default());
                    changed = true;
                }
            }
            i += 1;
        }
        changed
    }

    pub fn table(&self, index: usize) -> Option<&Table> {
        self.nodes.get(index).and_then(Node::as_table)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Node {
    Paragraph { text: String, #[serde(skip_serializing_if = "Option::is_none")] spans: Option<Vec<InlineSpan>> },
    Heading { level: u8, text: String, #[serde(skip_serializing_if = "Option::is_none")] spans: Option<Vec<InlineSpan>> },
    Image { src: String, alt: String },
    Table(Table),
}

impl Default for Node {
    fn default() -> Self {
        Node::Paragraph { text: String::new(), spans: None }
    }
}

impl Node {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph { text: text.into(), spans: None }
    }

    /// Text blocks are empty when they carry no text; images and tables never are.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Paragraph { text, spans } | Node::Heading { text, spans, .. } => {
                text.is_empty() && spans.as_ref().map_or(true, |sp| sp.iter().all(|s| s.text.is_empty()))
            }
            Node::Image { .. } | Node::Table(_) => false,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Node::Table(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InlineStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InlineSpan {
    pub text: String,
    #[serde(default)]
    pub style: InlineStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    /// A `rows x cols` table of empty, unspanned cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows: (0..rows).map(|_| TableRow::empty(cols)).collect() }
    }

    /// Logical column count. The first row always covers every column.
    /// Saturates on absurd spans; projection rejects those.
    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, |r| r.cells.iter().map(TableCell::col_span).fold(0, usize::saturating_add))
    }

    pub fn cell(&self, row: usize, cell: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(cell)
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    pub fn empty(cols: usize) -> Self {
        Self { cells: (0..cols).map(|_| TableCell::empty()).collect() }
    }
}

fn one() -> usize { 1 }

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default = "one")]
    pub row_span: usize,
    #[serde(default = "one")]
    pub col_span: usize,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Default for TableCell {
    fn default() -> Self {
        Self::empty()
    }
}

impl TableCell {
    /// A fresh cell holding one empty paragraph.
    pub fn empty() -> Self {
        Self { row_span: 1, col_span: 1, children: vec![Node::default()] }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self { children: vec![Node::paragraph(text)], ..Self::empty() }
    }

    pub fn spanning(row_span: usize, col_span: usize) -> Self {
        Self { row_span, col_span, ..Self::empty() }
    }

    // Zero spans in stored documents are read as 1.
    pub fn row_span(&self) -> usize { self.row_span.max(1) }
    pub fn col_span(&self) -> usize { self.col_span.max(1) }

    pub fn is_merged(&self) -> bool {
        self.row_span() > 1 || self.col_span() > 1
    }

    /// A cell is empty when it holds nothing or a single empty paragraph.
    pub fn is_empty(&self) -> bool {
        match self.children.as_slice() {
            [] => true,
            [Node::Paragraph { .. }] => self.children[0].is_empty(),
            _ => false,
        }
    }
}
