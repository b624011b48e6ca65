//! The ordered-tree edit API table operations are replayed onto.
//!
//! Hosts own the document and implement [`TreeEdit`]; every call is applied
//! immediately, so a path computed after one edit already reflects it. Paths
//! queued before an edit are NOT adjusted, which is why each operation in
//! [`crate::ops`] fixes its own replay order.

use crate::doc::{Doc, Node, Table, TableCell, TableRow};
use crate::error::{Result, TableError};
use crate::path::NodePath;

/// Borrowed view of whatever a path points at.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Block(&'a Node),
    Row(&'a TableRow),
    Cell(&'a TableCell),
}

/// Nodes to insert. The variant must match the level `at` points into.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Blocks(Vec<Node>),
    Rows(Vec<TableRow>),
    Cells(Vec<TableCell>),
}

/// Cell properties; `None` leaves a value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanProps {
    pub row_span: Option<usize>,
    pub col_span: Option<usize>,
}

impl SpanProps {
    pub fn rows(row_span: usize) -> Self { Self { row_span: Some(row_span), col_span: None } }
    pub fn cols(col_span: usize) -> Self { Self { row_span: None, col_span: Some(col_span) } }
    pub fn both(row_span: usize, col_span: usize) -> Self { Self { row_span: Some(row_span), col_span: Some(col_span) } }
}

pub trait TreeEdit {
    fn node_at(&self, path: &NodePath) -> Option<NodeRef<'_>>;

    /// Insert `fragment` so its first node ends up at `at`.
    fn insert(&mut self, at: &NodePath, fragment: Fragment) -> Result<()>;

    fn remove(&mut self, at: &NodePath) -> Result<()>;

    fn set_properties(&mut self, at: &NodePath, props: SpanProps) -> Result<()>;

    /// Detach the node at `from` and reinsert it at `to`, where `to` is read
    /// against the tree with `from` already removed.
    fn move_node(&mut self, from: &NodePath, to: &NodePath) -> Result<()>;

    /// Place the caret inside the given cell, or clear it.
    fn select(&mut self, caret: Option<NodePath>);

    fn is_empty(&self, node: NodeRef<'_>) -> bool {
        match node {
            NodeRef::Block(b) => b.is_empty(),
            NodeRef::Row(r) => r.cells.is_empty(),
            NodeRef::Cell(c) => c.is_empty(),
        }
    }
}

pub fn table_at<'a, T: TreeEdit + ?Sized>(tree: &'a T, path: &NodePath) -> Result<&'a Table> {
    match tree.node_at(path) {
        Some(NodeRef::Block(Node::Table(t))) => Ok(t),
        Some(_) => Err(TableError::NotATable(path.clone())),
        None => Err(TableError::InvalidPath(path.clone())),
    }
}

pub fn cell_at<'a, T: TreeEdit + ?Sized>(tree: &'a T, path: &NodePath) -> Result<&'a TableCell> {
    match tree.node_at(path) {
        Some(NodeRef::Cell(c)) => Ok(c),
        _ => Err(TableError::InvalidPath(path.clone())),
    }
}

enum NodeMut<'a> {
    Root(&'a mut Vec<Node>),
    Block(&'a mut Node),
    Row(&'a mut TableRow),
    Cell(&'a mut TableCell),
}

fn resolve<'a>(nodes: &'a [Node], path: &[usize]) -> Option<NodeRef<'a>> {
    let (&first, rest) = path.split_first()?;
    let node = nodes.get(first)?;
    let Some((&r, rest)) = rest.split_first() else { return Some(NodeRef::Block(node)) };
    let row = node.as_table()?.rows.get(r)?;
    let Some((&c, rest)) = rest.split_first() else { return Some(NodeRef::Row(row)) };
    let cell = row.cells.get(c)?;
    if rest.is_empty() { Some(NodeRef::Cell(cell)) } else { resolve(&cell.children, rest) }
}

fn resolve_mut<'a>(nodes: &'a mut Vec<Node>, path: &[usize]) -> Option<NodeMut<'a>> {
    let Some((&first, rest)) = path.split_first() else { return Some(NodeMut::Root(nodes)) };
    let node = nodes.get_mut(first)?;
    let Some((&r, rest)) = rest.split_first() else { return Some(NodeMut::Block(node)) };
    let Node::Table(table) = node else { return None };
    let row = table.rows.get_mut(r)?;
    let Some((&c, rest)) = rest.split_first() else { return Some(NodeMut::Row(row)) };
    let cell = row.cells.get_mut(c)?;
    if rest.is_empty() { Some(NodeMut::Cell(cell)) } else { resolve_mut(&mut cell.children, rest) }
}

fn splice<T>(items: &mut Vec<T>, at: usize, new: Vec<T>) -> bool {
    if at > items.len() { return false; }
    items.splice(at..at, new);
    true
}

fn take<T>(items: &mut Vec<T>, at: usize) -> Option<T> {
    (at < items.len()).then(|| items.remove(at))
}

impl Doc {
    fn split(path: &NodePath) -> Result<(NodePath, usize)> {
        match (path.parent(), path.last()) {
            (Some(parent), Some(index)) => Ok((parent, index)),
            _ => Err(TableError::InvalidPath(path.clone())),
        }
    }

    fn take_node(&mut self, at: &NodePath) -> Result<Fragment> {
        let (parent, index) = Self::split(at)?;
        let taken = match resolve_mut(&mut self.nodes, parent.as_slice()) {
            Some(NodeMut::Root(nodes)) => take(nodes, index).map(|n| Fragment::Blocks(vec![n])),
            Some(NodeMut::Cell(cell)) => take(&mut cell.children, index).map(|n| Fragment::Blocks(vec![n])),
            Some(NodeMut::Block(Node::Table(t))) => take(&mut t.rows, index).map(|r| Fragment::Rows(vec![r])),
            Some(NodeMut::Row(row)) => take(&mut row.cells, index).map(|c| Fragment::Cells(vec![c])),
            _ => None,
        };
        taken.ok_or_else(|| TableError::InvalidPath(at.clone()))
    }
}

impl TreeEdit for Doc {
    fn node_at(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        resolve(&self.nodes, path.as_slice())
    }

    fn insert(&mut self, at: &NodePath, fragment: Fragment) -> Result<()> {
        let (parent, index) = Self::split(at)?;
        tracing::trace!(%at, "insert");
        let ok = match (resolve_mut(&mut self.nodes, parent.as_slice()), fragment) {
            (Some(NodeMut::Root(nodes)), Fragment::Blocks(blocks)) => splice(nodes, index, blocks),
            (Some(NodeMut::Cell(cell)), Fragment::Blocks(blocks)) => splice(&mut cell.children, index, blocks),
            (Some(NodeMut::Block(Node::Table(t))), Fragment::Rows(rows)) => splice(&mut t.rows, index, rows),
            (Some(NodeMut::Row(row)), Fragment::Cells(cells)) => splice(&mut row.cells, index, cells),
            _ => false,
        };
        if ok { Ok(()) } else { Err(TableError::InvalidPath(at.clone())) }
    }

    fn remove(&mut self, at: &NodePath) -> Result<()> {
        tracing::trace!(%at, "remove");
        self.take_node(at).map(|_| ())
    }

    fn set_properties(&mut self, at: &NodePath, props: SpanProps) -> Result<()> {
        tracing::trace!(%at, ?props, "set_properties");
        let Some(NodeMut::Cell(cell)) = resolve_mut(&mut self.nodes, at.as_slice()) else {
            return Err(TableError::InvalidPath(at.clone()));
        };
        if let Some(rs) = props.row_span { cell.row_span = rs; }
        if let Some(cs) = props.col_span { cell.col_span = cs; }
        Ok(())
    }

    fn move_node(&mut self, from: &NodePath, to: &NodePath) -> Result<()> {
        tracing::trace!(%from, %to, "move_node");
        let node = self.take_node(from)?;
        self.insert(to, node)
    }

    fn select(&mut self, caret: Option<NodePath>) {
        self.caret = caret;
    }
}
