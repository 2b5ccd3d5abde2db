use std::cmp::Ordering;

use log::debug;

use crate::bbox::bounding_box;
use crate::error::{KDTreeError, Result};
use crate::kdtree::index::{KDTree, NodeData, NodeKind};
use crate::points::Points;
use crate::r#type::CoordNum;

/// The default minimum leaf size used by [`KDTreeBuilder::new`].
pub const DEFAULT_MIN_LEAF_SIZE: usize = 16;

/// A builder to create a [`KDTree`].
///
/// ```
/// use kdtree_edges::KDTreeBuilder;
///
/// let points = [0., 0., 1., 1., 2., 2., 3., 3.];
/// let tree = KDTreeBuilder::new_with_min_leaf_size(2, 1)
///     .build(&points)
///     .unwrap();
/// assert_eq!(tree.num_points(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KDTreeBuilder {
    dimension: usize,
    min_leaf_size: usize,
}

impl KDTreeBuilder {
    /// Create a new builder for points of the given dimension and the default minimum leaf size.
    pub fn new(dimension: usize) -> Self {
        Self::new_with_min_leaf_size(dimension, DEFAULT_MIN_LEAF_SIZE)
    }

    /// Create a new builder with the provided dimension and minimum leaf size.
    pub fn new_with_min_leaf_size(dimension: usize, min_leaf_size: usize) -> Self {
        Self {
            dimension,
            min_leaf_size,
        }
    }

    /// The number of coordinates per point.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Nodes holding at most this many points become leaves.
    pub fn min_leaf_size(&self) -> usize {
        self.min_leaf_size
    }

    /// Copy the points and recursively partition them into a tree ready for queries.
    ///
    /// The input is never modified: the tree reorders its own copy.
    pub fn build<N: CoordNum>(&self, points: &[N]) -> Result<KDTree<N>> {
        if points.is_empty() {
            return Err(KDTreeError::InvalidArgument(
                "cannot build a KDTree from an empty points buffer".to_string(),
            ));
        }
        let input = Points::try_new(points, self.dimension)?;
        if self.min_leaf_size < 1 {
            return Err(KDTreeError::InvalidArgument(
                "min_leaf_size must be at least 1".to_string(),
            ));
        }
        if points.iter().any(|v| v.is_nan()) {
            return Err(KDTreeError::InvalidArgument(
                "points must not contain NaN coordinates".to_string(),
            ));
        }

        let num_points = input.num_points();
        let mut tree = KDTree {
            points: points.to_vec(),
            order: (0..num_points as u32).collect(),
            nodes: Vec::new(),
            boxes: Vec::new(),
            dimension: self.dimension,
            min_leaf_size: self.min_leaf_size,
        };
        partition(&mut tree);

        debug!(
            "built KDTree<{}>(num_points={}, dimension={}, min_leaf_size={}) with {} nodes",
            N::COORD_TYPE,
            num_points,
            self.dimension,
            self.min_leaf_size,
            tree.nodes.len()
        );
        Ok(tree)
    }
}

/// Build the node arena of `tree`, reordering its points and order in place.
///
/// Nodes are processed from an explicit work stack, never by recursion.
fn partition<N: CoordNum>(tree: &mut KDTree<N>) {
    let dimension = tree.dimension;
    let num_points = tree.order.len();

    allocate_node(tree, 0, num_points);
    let mut stack = vec![0usize];

    // scratch buffers reused across nodes
    let mut perm: Vec<usize> = Vec::with_capacity(num_points);
    let mut tmp_points: Vec<N> = Vec::with_capacity(tree.points.len());
    let mut tmp_order: Vec<u32> = Vec::with_capacity(num_points);

    while let Some(id) = stack.pop() {
        let NodeData { start, end, .. } = tree.nodes[id];
        let (min, max) = bounding_box(&tree.points[start * dimension..end * dimension], dimension);
        let offset = id * 2 * dimension;
        tree.boxes[offset..offset + dimension].copy_from_slice(&min);
        tree.boxes[offset + dimension..offset + 2 * dimension].copy_from_slice(&max);

        if end - start <= tree.min_leaf_size {
            continue;
        }

        // the axis with the largest spread, lowest axis on ties
        let mut axis = 0;
        let mut max_range = max[0] - min[0];
        for d in 1..dimension {
            let range = max[d] - min[d];
            if range > max_range {
                max_range = range;
                axis = d;
            }
        }
        if max_range == N::zero() {
            // all points are identical
            continue;
        }

        // sort the range along the split axis, moving points and order together
        perm.clear();
        perm.extend(start..end);
        perm.sort_by(|&a, &b| {
            let va = tree.points[a * dimension + axis];
            let vb = tree.points[b * dimension + axis];
            va.partial_cmp(&vb).unwrap_or(Ordering::Equal)
        });
        tmp_points.clear();
        tmp_order.clear();
        for &src in perm.iter() {
            tmp_points.extend_from_slice(&tree.points[src * dimension..(src + 1) * dimension]);
            tmp_order.push(tree.order[src]);
        }
        tree.points[start * dimension..end * dimension].copy_from_slice(&tmp_points);
        tree.order[start..end].copy_from_slice(&tmp_order);

        // Take the median value, then move the split back past any duplicates of it so that the
        // left child is strictly below the split value.
        let mut split = start + (end - start) / 2;
        let value = tree.points[split * dimension + axis];
        while split > start && tree.points[(split - 1) * dimension + axis] >= value {
            split -= 1;
        }
        if split == start {
            // too many ties on the split axis
            continue;
        }

        let left = allocate_node(tree, start, split);
        let right = allocate_node(tree, split, end);
        tree.nodes[id].kind = NodeKind::Split {
            axis,
            value,
            left,
            right,
        };

        stack.push(right);
        stack.push(left);
    }
}

/// Append a leaf covering `[start, end)` with a zeroed box and return its id.
fn allocate_node<N: CoordNum>(tree: &mut KDTree<N>, start: usize, end: usize) -> usize {
    let id = tree.nodes.len();
    tree.nodes.push(NodeData::leaf(start, end));
    tree.boxes.extend(std::iter::repeat(N::zero()).take(2 * tree.dimension));
    id
}
