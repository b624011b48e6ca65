//! Node paths into the document tree.
//!
//! A path is the list of child indices from the document root. Table paths
//! point at a block, row paths add the row index, cell paths add the cell
//! index inside that row, and anything deeper walks into cell content.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn as_slice(&self) -> &[usize] { &self.0 }
    pub fn last(&self) -> Option<usize> { self.0.last().copied() }

    pub fn parent(&self) -> Option<NodePath> {
        let (_, head) = self.0.split_last()?;
        Some(Self(head.to_vec()))
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Sibling right after this node.
    pub fn next(&self) -> Option<NodePath> {
        let (last, head) = self.0.split_last()?;
        let mut indices = head.to_vec();
        indices.push(last + 1);
        Some(Self(indices))
    }

    /// The indices below `ancestor`, if this path lies inside it.
    pub fn relative_to(&self, ancestor: &NodePath) -> Option<&[usize]> {
        self.0.strip_prefix(ancestor.0.as_slice())
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self { Self(indices) }
}

impl From<&[usize]> for NodePath {
    fn from(indices: &[usize]) -> Self { Self(indices.to_vec()) }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(indices: [usize; N]) -> Self { Self(indices.to_vec()) }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{index}")?;
        }
        write!(f, "]")
    }
}
