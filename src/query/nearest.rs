//! The closest target point for every source point.

use log::debug;
#[cfg(feature = "rayon")]
use rayon::iter::ParallelIterator;
#[cfg(feature = "rayon")]
use rayon::slice::ParallelSlice;
use tinyvec::TinyVec;

use crate::bbox::sq_dist;
use crate::edges::Edges;
use crate::error::{KDTreeError, Result};
use crate::kdtree::{KDTree, KDTreeBuilder, NodeKind, DEFAULT_MIN_LEAF_SIZE};
use crate::points::{Points, PointsRef};
use crate::r#type::CoordNum;

impl<N: CoordNum> KDTree<N> {
    /// Connect every source point to its closest point in the tree.
    ///
    /// The tree is built over the target points. The result holds exactly one edge per source
    /// point, in source order: edge `i` connects source point `i` to the original index of its
    /// nearest tree point. Ties keep the first point found by the search.
    ///
    /// ```
    /// use kdtree_edges::KDTree;
    ///
    /// let target = [0., 0., 10., 10.];
    /// let tree = KDTree::try_new(&target, 2, 1).unwrap();
    ///
    /// let source = [9., 9., 1., 1., 6., 6.];
    /// let edges = tree.nearest_edges(&source, 2).unwrap();
    /// assert_eq!(edges.source(), &[0, 1, 2]);
    /// assert_eq!(edges.target(), &[1, 0, 1]);
    /// ```
    pub fn nearest_edges(&self, source: &[N], dimension: usize) -> Result<Edges> {
        if dimension != self.dimension {
            return Err(KDTreeError::DimensionMismatch {
                source_dim: dimension,
                target_dim: self.dimension,
            });
        }
        let source = Points::try_new(source, dimension)?;
        if source.is_empty() {
            return Err(KDTreeError::EmptyInput(
                "nearest edges need at least one source point".to_string(),
            ));
        }

        #[cfg(feature = "rayon")]
        let target: Vec<u32> = source
            .coords()
            .par_chunks_exact(dimension)
            .map(|point| self.nearest(point).0)
            .collect();

        #[cfg(not(feature = "rayon"))]
        let target: Vec<u32> = source.iter().map(|point| self.nearest(point).0).collect();

        let num_edges = source.num_points();
        assert_eq!(
            target.len(),
            num_edges,
            "number of edges differs from the number of source points"
        );
        debug!(
            "nearest search for {} source points over {} target points",
            num_edges,
            self.num_points()
        );
        Edges::try_new((0..num_edges as u32).collect(), target)
    }

    /// The original index of the tree point closest to `point`, and its squared distance.
    ///
    /// `point` must have [`KDTree::dimension`] coordinates.
    pub fn nearest(&self, point: &[N]) -> (u32, N) {
        debug_assert_eq!(point.len(), self.dimension);

        let mut best: Option<usize> = None;
        let mut best_dist2 = N::infinity();

        // Pending nodes with the squared distance from the query to the plane separating them
        // from the nodes already searched. Near children are pushed last so they pop first.
        let mut stack: TinyVec<[(usize, N); 32]> = TinyVec::new();
        stack.push((0, N::zero()));

        while let Some((id, plane_dist2)) = stack.pop() {
            if best.is_some() && plane_dist2 >= best_dist2 {
                continue;
            }

            let node = &self.nodes[id];
            match node.kind {
                NodeKind::Leaf => {
                    for i in node.start..node.end {
                        let dist2 = sq_dist(point, self.point(i));
                        if best.is_none() || dist2 < best_dist2 {
                            best = Some(i);
                            best_dist2 = dist2;
                        }
                    }
                }
                NodeKind::Split {
                    axis,
                    value,
                    left,
                    right,
                } => {
                    let (near, far) = if point[axis] < value {
                        (left, right)
                    } else {
                        (right, left)
                    };
                    let delta = point[axis] - value;
                    stack.push((far, delta * delta));
                    stack.push((near, N::zero()));
                }
            }
        }

        // every leaf holds at least one point, so the first leaf visited sets `best`
        let best = best.unwrap_or(0);
        (self.order[best], best_dist2)
    }
}

/// Edges connecting each source point to its closest target point.
///
/// The coordinate type of the points is only known at runtime. A [`KDTree`] is built over the
/// target points.
///
/// ```
/// use kdtree_edges::{NearestEdges, Points};
///
/// let source = [0.1f64, 0.1, 2.0, 2.0];
/// let target = [2.1f64, 2.1, 0.0, 0.0];
/// let edges = NearestEdges::new(
///     Points::try_new(&source, 2).unwrap(),
///     Points::try_new(&target, 2).unwrap(),
/// )
/// .done()
/// .unwrap();
/// assert_eq!(edges.target(), &[1, 0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NearestEdges<'a> {
    source: PointsRef<'a>,
    target: PointsRef<'a>,
    min_leaf_size: usize,
}

impl<'a> NearestEdges<'a> {
    /// Configure a nearest neighbor search. Call [`NearestEdges::done`] to run it.
    pub fn new(source: impl Into<PointsRef<'a>>, target: impl Into<PointsRef<'a>>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            min_leaf_size: DEFAULT_MIN_LEAF_SIZE,
        }
    }

    /// Set the minimum leaf size of the tree built over the target points.
    pub fn min_leaf_size(mut self, min_leaf_size: usize) -> Self {
        self.min_leaf_size = min_leaf_size;
        self
    }

    /// Build the index over the target points and run the search.
    pub fn done(&self) -> Result<Edges> {
        if self.source.is_empty() || self.target.is_empty() {
            return Err(KDTreeError::EmptyInput(format!(
                "nearest edges source ({} points) or target ({} points) are empty",
                self.source.num_points(),
                self.target.num_points()
            )));
        }
        if self.source.dimension() != self.target.dimension() {
            return Err(KDTreeError::DimensionMismatch {
                source_dim: self.source.dimension(),
                target_dim: self.target.dimension(),
            });
        }
        match (self.source, self.target) {
            (PointsRef::Float32(source), PointsRef::Float32(target)) => {
                nearest_edges_impl(source, target, self.min_leaf_size)
            }
            (PointsRef::Float64(source), PointsRef::Float64(target)) => {
                nearest_edges_impl(source, target, self.min_leaf_size)
            }
            (source, target) => Err(KDTreeError::DTypeMismatch {
                source_type: source.coord_type(),
                target_type: target.coord_type(),
            }),
        }
    }
}

fn nearest_edges_impl<N: CoordNum>(
    source: Points<'_, N>,
    target: Points<'_, N>,
    min_leaf_size: usize,
) -> Result<Edges> {
    let tree = KDTreeBuilder::new_with_min_leaf_size(target.dimension(), min_leaf_size)
        .build(target.coords())?;
    tree.nearest_edges(source.coords(), source.dimension())
}
