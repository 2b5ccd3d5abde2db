use std::fmt;

use crate::error::Result;
use crate::kdtree::builder::{KDTreeBuilder, DEFAULT_MIN_LEAF_SIZE};
use crate::kdtree::traversal::Node;
use crate::r#type::CoordNum;

/// Whether a node is a leaf or splits its points between two children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NodeKind<N: CoordNum> {
    Leaf,
    Split {
        axis: usize,
        value: N,
        left: usize,
        right: usize,
    },
}

/// A node stored in the tree's arena. Its bounding box lives in [`KDTree::boxes`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeData<N: CoordNum> {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) kind: NodeKind<N>,
}

impl<N: CoordNum> NodeData<N> {
    pub(crate) fn leaf(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind: NodeKind::Leaf,
        }
    }
}

/// An immutable K-D tree over a set of points of any dimension.
///
/// The tree owns a reordered copy of the input points. [`KDTree::order`] maps each stored
/// position back to the index of the point in the buffer the tree was built from, and every
/// query result is reported in those original indices.
///
/// Usually this will be created via [`KDTree::try_new`] or a [`KDTreeBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct KDTree<N: CoordNum> {
    pub(crate) points: Vec<N>,
    pub(crate) order: Vec<u32>,
    /// Node arena, the root is node 0.
    pub(crate) nodes: Vec<NodeData<N>>,
    /// `2 * dimension` values per node: the box minimum followed by the box maximum.
    pub(crate) boxes: Vec<N>,
    pub(crate) dimension: usize,
    pub(crate) min_leaf_size: usize,
}

impl<N: CoordNum> KDTree<N> {
    /// Build a tree over a flat, row-major buffer of points.
    ///
    /// Nodes holding `min_leaf_size` points or fewer are not split any further.
    pub fn try_new(points: &[N], dimension: usize, min_leaf_size: usize) -> Result<Self> {
        KDTreeBuilder::new_with_min_leaf_size(dimension, min_leaf_size).build(points)
    }

    /// Build a tree with the default minimum leaf size.
    pub fn try_new_with_default_leaf_size(points: &[N], dimension: usize) -> Result<Self> {
        Self::try_new(points, dimension, DEFAULT_MIN_LEAF_SIZE)
    }

    /// The reordered point coordinates held by the tree.
    pub fn points(&self) -> &[N] {
        &self.points
    }

    /// `order()[i]` is the original index of the point stored at position `i`.
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    /// The number of coordinates of each point.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The number of points in the tree.
    pub fn num_points(&self) -> usize {
        self.order.len()
    }

    /// The minimum leaf size the tree was built with.
    pub fn min_leaf_size(&self) -> usize {
        self.min_leaf_size
    }

    /// The total number of nodes, leaves included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The coordinates of the point stored at position `i`.
    #[inline]
    pub fn point(&self, i: usize) -> &[N] {
        &self.points[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Access the root node of the tree for manual traversal.
    pub fn root(&self) -> Node<'_, N> {
        Node::new(self, 0)
    }

    /// The number of levels of the tree. A tree that is a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(0usize, 1usize)];
        while let Some((id, level)) = stack.pop() {
            depth = depth.max(level);
            if let NodeKind::Split { left, right, .. } = self.nodes[id].kind {
                stack.push((left, level + 1));
                stack.push((right, level + 1));
            }
        }
        depth
    }

    #[inline]
    pub(crate) fn node_box(&self, id: usize) -> (&[N], &[N]) {
        let offset = id * 2 * self.dimension;
        let (min, max) = self.boxes[offset..offset + 2 * self.dimension].split_at(self.dimension);
        (min, max)
    }
}

impl<N: CoordNum> fmt::Display for KDTree<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "KDTree (num_points: {}, dimension: {}):",
            self.num_points(),
            self.dimension
        )?;

        let mut stack = vec![("Root", self.root(), 0usize)];
        while let Some((label, node, depth)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match node.children() {
                Some((left, right)) => {
                    writeln!(
                        f,
                        "{}{} node (axis: {}, value: {}, bounding-box={:?} - {:?}):",
                        indent,
                        label,
                        node.split_axis().unwrap_or_default(),
                        node.split_value().unwrap_or_default(),
                        node.min(),
                        node.max()
                    )?;
                    stack.push(("Right", right, depth + 1));
                    stack.push(("Left", left, depth + 1));
                }
                None => {
                    writeln!(f, "{}{} leaf node:", indent, label)?;
                    let points = node.points().chunks_exact(self.dimension);
                    for (point, original) in points.zip(node.original_indices()) {
                        writeln!(f, "{}  {:?} (original index: {})", indent, point, original)?;
                    }
                }
            }
        }
        Ok(())
    }
}
