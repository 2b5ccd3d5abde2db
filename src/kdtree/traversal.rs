//! Utilities to traverse the KDTree structure.

use std::ops::Range;

use crate::kdtree::index::{KDTree, NodeKind};
use crate::r#type::CoordNum;

/// A node in the KDTree.
///
/// A node covers a contiguous range of the tree's reordered points. Internal nodes split that
/// range in two: points whose coordinate on [`Node::split_axis`] is below [`Node::split_value`]
/// go to the left child, all others to the right child.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a, N: CoordNum> {
    /// The tree that this node is a reference onto
    tree: &'a KDTree<N>,
    id: usize,
}

impl<'a, N: CoordNum> Node<'a, N> {
    pub(crate) fn new(tree: &'a KDTree<N>, id: usize) -> Self {
        Self { tree, id }
    }

    /// The position of this node in the tree's node arena. The root is `0`.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The minimum corner of this node's bounding box.
    pub fn min(&self) -> &'a [N] {
        self.tree.node_box(self.id).0
    }

    /// The maximum corner of this node's bounding box.
    pub fn max(&self) -> &'a [N] {
        self.tree.node_box(self.id).1
    }

    /// The range of positions in [`KDTree::points`] and [`KDTree::order`] owned by this node.
    pub fn range(&self) -> Range<usize> {
        let node = &self.tree.nodes[self.id];
        node.start..node.end
    }

    /// The number of points owned by this node.
    pub fn num_points(&self) -> usize {
        self.range().len()
    }

    /// The flat coordinates of the points owned by this node.
    pub fn points(&self) -> &'a [N] {
        let range = self.range();
        let dimension = self.tree.dimension;
        &self.tree.points[range.start * dimension..range.end * dimension]
    }

    /// The original indices of the points owned by this node.
    pub fn original_indices(&self) -> &'a [u32] {
        &self.tree.order[self.range()]
    }

    /// The axis this node's children are split over, `None` for leaves.
    pub fn split_axis(&self) -> Option<usize> {
        match self.tree.nodes[self.id].kind {
            NodeKind::Split { axis, .. } => Some(axis),
            NodeKind::Leaf => None,
        }
    }

    /// The value this node's children are split at, `None` for leaves.
    pub fn split_value(&self) -> Option<N> {
        match self.tree.nodes[self.id].kind {
            NodeKind::Split { value, .. } => Some(value),
            NodeKind::Leaf => None,
        }
    }

    /// The `(left, right)` children of an internal node.
    pub fn children(&self) -> Option<(Node<'a, N>, Node<'a, N>)> {
        match self.tree.nodes[self.id].kind {
            NodeKind::Split { left, right, .. } => {
                Some((Node::new(self.tree, left), Node::new(self.tree, right)))
            }
            NodeKind::Leaf => None,
        }
    }

    /// The child holding the points below the split value.
    pub fn left_child(&self) -> Option<Node<'a, N>> {
        self.children().map(|(left, _)| left)
    }

    /// The child holding the points at or above the split value.
    pub fn right_child(&self) -> Option<Node<'a, N>> {
        self.children().map(|(_, right)| right)
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.tree.nodes[self.id].kind, NodeKind::Leaf)
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }
}
