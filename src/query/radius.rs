//! All pairs of points within a distance of each other.

use log::debug;
#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::bbox::{intersects_radius, sq_dist};
use crate::edges::Edges;
use crate::error::{KDTreeError, Result};
use crate::kdtree::{KDTree, KDTreeBuilder, NodeKind, DEFAULT_MIN_LEAF_SIZE};
use crate::points::{Points, PointsRef};
use crate::r#type::CoordNum;

/// Number of tree levels expanded before handing subtrees to the thread pool.
#[cfg(feature = "rayon")]
const PARALLEL_SPLIT_DEPTH: usize = 4;

impl<N: CoordNum> KDTree<N> {
    /// Find every pair of (tree point, target point) within `radius` of each other.
    ///
    /// The tree is built over the source points. Source indices in the result are original
    /// indices of the tree's input, target indices are positions in `target`. No pair appears
    /// twice, and the order of the edges is unspecified.
    ///
    /// An empty result is reported as [`KDTreeError::NoEdgesFound`].
    ///
    /// ```
    /// use kdtree_edges::KDTree;
    ///
    /// let source = [0., 0., 1., 0., 5., 5.];
    /// let tree = KDTree::try_new(&source, 2, 1).unwrap();
    ///
    /// let target = [0.5, 0.];
    /// let mut edges = tree.radius_edges(&target, 2, 0.6).unwrap();
    /// edges.sort_by_source();
    /// assert_eq!(edges.source(), &[0, 1]);
    /// assert_eq!(edges.target(), &[0, 0]);
    /// ```
    pub fn radius_edges(&self, target: &[N], dimension: usize, radius: N) -> Result<Edges> {
        if dimension != self.dimension {
            return Err(KDTreeError::DimensionMismatch {
                source_dim: self.dimension,
                target_dim: dimension,
            });
        }
        let target = Points::try_new(target, dimension)?;
        if radius.is_nan() || radius <= N::zero() {
            return Err(KDTreeError::InvalidArgument(format!(
                "radius must be positive, got {}",
                radius
            )));
        }

        let edges = self.radius_search(target, radius);
        assert_eq!(
            edges.source().len(),
            edges.target().len(),
            "number of source and target indices differ"
        );
        debug!(
            "radius search over {} source and {} target points with radius {} found {} edges",
            self.num_points(),
            target.num_points(),
            radius,
            edges.len()
        );
        if edges.is_empty() {
            return Err(KDTreeError::NoEdgesFound {
                radius: radius.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(edges)
    }

    fn radius_search(&self, target: Points<'_, N>, radius: N) -> Edges {
        let candidates: Vec<u32> = (0..target.num_points() as u32).collect();

        #[cfg(feature = "rayon")]
        {
            let subtrees = self.split_radius_search(target, radius, candidates);
            log::trace!("searching {} subtrees in parallel", subtrees.len());
            let results: Vec<Edges> = subtrees
                .into_par_iter()
                .map(|(id, candidates)| {
                    let mut edges = Edges::new();
                    self.radius_search_subtree(id, candidates, target, radius, &mut edges);
                    edges
                })
                .collect();

            let mut edges = Edges::with_capacity(results.iter().map(Edges::len).sum());
            for result in results {
                edges.append(result);
            }
            edges
        }

        #[cfg(not(feature = "rayon"))]
        {
            let mut edges = Edges::new();
            self.radius_search_subtree(0, candidates, target, radius, &mut edges);
            edges
        }
    }

    /// Expand the top levels of the tree into independent `(node, candidates)` work items.
    ///
    /// Candidates are filtered against each expanded node's box exactly as the sequential search
    /// would, and expansions that run out of candidates are dropped.
    #[cfg(feature = "rayon")]
    fn split_radius_search(
        &self,
        target: Points<'_, N>,
        radius: N,
        candidates: Vec<u32>,
    ) -> Vec<(usize, Vec<u32>)> {
        let radius2 = radius * radius;
        let mut frontier = vec![(0usize, candidates)];
        for _ in 0..PARALLEL_SPLIT_DEPTH {
            let mut next = Vec::with_capacity(frontier.len() * 2);
            for (id, mut candidates) in frontier {
                match self.nodes[id].kind {
                    NodeKind::Leaf => next.push((id, candidates)),
                    NodeKind::Split { left, right, .. } => {
                        let (min, max) = self.node_box(id);
                        candidates.retain(|&t| {
                            intersects_radius(target.point(t as usize), min, max, radius, radius2)
                        });
                        if !candidates.is_empty() {
                            next.push((left, candidates.clone()));
                            next.push((right, candidates));
                        }
                    }
                }
            }
            frontier = next;
        }
        frontier
    }

    /// Search the subtree rooted at `root`, pushing matches onto `edges`.
    ///
    /// `candidates` holds the target positions that may still match something below `root`. At
    /// each node it shrinks to the targets within `radius` of the node's box.
    fn radius_search_subtree(
        &self,
        root: usize,
        candidates: Vec<u32>,
        target: Points<'_, N>,
        radius: N,
        edges: &mut Edges,
    ) {
        let radius2 = radius * radius;
        let mut stack = vec![(root, candidates)];

        while let Some((id, mut candidates)) = stack.pop() {
            let (min, max) = self.node_box(id);
            candidates.retain(|&t| {
                intersects_radius(target.point(t as usize), min, max, radius, radius2)
            });
            if candidates.is_empty() {
                continue;
            }

            let node = &self.nodes[id];
            match node.kind {
                NodeKind::Leaf => {
                    for i in node.start..node.end {
                        let point = self.point(i);
                        let source = self.order[i];
                        for &t in candidates.iter() {
                            if sq_dist(point, target.point(t as usize)) <= radius2 {
                                edges.push(source, t);
                            }
                        }
                    }
                }
                NodeKind::Split { left, right, .. } => {
                    stack.push((right, candidates.clone()));
                    stack.push((left, candidates));
                }
            }
        }
    }
}

/// Edges connecting source points to every target point within a radius.
///
/// The coordinate type of the points is only known at runtime. A [`KDTree`] is built over the
/// source points, so prefer passing the larger point set as the source.
///
/// ```
/// use kdtree_edges::{Points, RadiusEdges};
///
/// let source = [0.0f32, 0., 1., 1., 2., 2.];
/// let target = [0.9f32, 1.1];
/// let edges = RadiusEdges::new(
///     Points::try_new(&source, 2).unwrap(),
///     Points::try_new(&target, 2).unwrap(),
///     0.5,
/// )
/// .done()
/// .unwrap();
/// assert_eq!(edges.iter().collect::<Vec<_>>(), vec![(1, 0)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RadiusEdges<'a> {
    source: PointsRef<'a>,
    target: PointsRef<'a>,
    radius: f64,
    min_leaf_size: usize,
}

impl<'a> RadiusEdges<'a> {
    /// Configure a radius search. Call [`RadiusEdges::done`] to run it.
    pub fn new(
        source: impl Into<PointsRef<'a>>,
        target: impl Into<PointsRef<'a>>,
        radius: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            radius,
            min_leaf_size: DEFAULT_MIN_LEAF_SIZE,
        }
    }

    /// Set the minimum leaf size of the tree built over the source points.
    pub fn min_leaf_size(mut self, min_leaf_size: usize) -> Self {
        self.min_leaf_size = min_leaf_size;
        self
    }

    /// Build the index over the source points and run the search.
    ///
    /// For single precision points the radius is rounded up, never down, to the nearest `f32`.
    pub fn done(&self) -> Result<Edges> {
        if self.source.dimension() != self.target.dimension() {
            return Err(KDTreeError::DimensionMismatch {
                source_dim: self.source.dimension(),
                target_dim: self.target.dimension(),
            });
        }
        let result = match (self.source, self.target) {
            (PointsRef::Float32(source), PointsRef::Float32(target)) => {
                radius_edges_impl(source, target, self.radius, self.min_leaf_size)
            }
            (PointsRef::Float64(source), PointsRef::Float64(target)) => {
                radius_edges_impl(source, target, self.radius, self.min_leaf_size)
            }
            (source, target) => Err(KDTreeError::DTypeMismatch {
                source_type: source.coord_type(),
                target_type: target.coord_type(),
            }),
        };

        // report the radius as configured rather than its converted value
        result.map_err(|err| match err {
            KDTreeError::NoEdgesFound { .. } => KDTreeError::NoEdgesFound {
                radius: self.radius,
            },
            err => err,
        })
    }
}

fn radius_edges_impl<N: CoordNum>(
    source: Points<'_, N>,
    target: Points<'_, N>,
    radius: f64,
    min_leaf_size: usize,
) -> Result<Edges> {
    if radius.is_nan() || radius <= 0.0 {
        return Err(KDTreeError::InvalidArgument(format!(
            "radius must be positive, got {}",
            radius
        )));
    }
    let tree = KDTreeBuilder::new_with_min_leaf_size(source.dimension(), min_leaf_size)
        .build(source.coords())?;
    tree.radius_edges(target.coords(), target.dimension(), N::radius_from_f64(radius))
}
