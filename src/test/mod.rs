//! Fixtures and brute-force references shared by the unit tests.

use num_traits::NumCast;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bbox::sq_dist;
use crate::kdtree::{KDTree, Node};
use crate::r#type::CoordNum;

/// `num_points` random points of the given dimension, uniform in `[-1, 1)` on every axis.
pub(crate) fn random_points<N: CoordNum>(num_points: usize, dimension: usize, seed: u64) -> Vec<N> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_points * dimension)
        .map(|_| <N as NumCast>::from(rng.gen_range(-1.0f64..1.0)).unwrap())
        .collect()
}

/// The 16 sample 2D points used by the tree structure tests.
pub(crate) fn sample_points() -> Vec<f64> {
    vec![
        2., 3., // 0
        5., 4., // 1
        9., 6., // 2
        4., 7., // 3
        8., 1., // 4
        7., 2., // 5
        1., 8., // 6
        6., 5., // 7
        10., 10., // 8
        0., 0., // 9
        3., 9., // 10
        11., 2., // 11
        -1., 5., // 12
        12., 8., // 13
        6., 0., // 14
        5., 5., // 15
    ]
}

/// All `(source, target)` pairs within `radius`, in lexicographic order.
pub(crate) fn brute_force_radius<N: CoordNum>(
    source: &[N],
    target: &[N],
    dimension: usize,
    radius: N,
) -> Vec<(u32, u32)> {
    let radius2 = radius * radius;
    let mut pairs = vec![];
    for (i, s) in source.chunks_exact(dimension).enumerate() {
        for (j, t) in target.chunks_exact(dimension).enumerate() {
            if sq_dist(s, t) <= radius2 {
                pairs.push((i as u32, j as u32));
            }
        }
    }
    pairs
}

/// The index of the closest target point, lowest index on ties.
pub(crate) fn brute_force_nearest<N: CoordNum>(point: &[N], target: &[N], dimension: usize) -> u32 {
    let mut best = 0;
    let mut best_dist2 = N::infinity();
    for (j, t) in target.chunks_exact(dimension).enumerate() {
        let dist2 = sq_dist(point, t);
        if dist2 < best_dist2 {
            best_dist2 = dist2;
            best = j;
        }
    }
    best as u32
}

/// Check every structural invariant of `tree` against the points it was built from.
///
/// Returns the number of nodes visited.
pub(crate) fn check_tree<N: CoordNum>(tree: &KDTree<N>, original: &[N]) -> usize {
    let dimension = tree.dimension();

    // order is a permutation that reconstructs the input
    let mut seen = vec![false; tree.num_points()];
    let mut reconstructed = vec![N::zero(); original.len()];
    for (i, &o) in tree.order().iter().enumerate() {
        let o = o as usize;
        assert!(!seen[o], "original index {} appears twice", o);
        seen[o] = true;
        reconstructed[o * dimension..(o + 1) * dimension].copy_from_slice(tree.point(i));
    }
    assert_eq!(reconstructed, original, "order does not reconstruct the input");

    let root = tree.root();
    assert_eq!(root.range(), 0..tree.num_points());

    let mut count = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        count += 1;
        check_node(tree, &node);
        if let Some((left, right)) = node.children() {
            stack.push(left);
            stack.push(right);
        }
    }
    assert_eq!(count, tree.num_nodes());
    count
}

fn check_node<N: CoordNum>(tree: &KDTree<N>, node: &Node<'_, N>) {
    let dimension = tree.dimension();
    let (min, max) = (node.min(), node.max());

    // tight bounding box
    for axis in 0..dimension {
        let values = node.points().chunks_exact(dimension).map(|p| p[axis]);
        let mut attained_min = false;
        let mut attained_max = false;
        for v in values {
            assert!(min[axis] <= v && v <= max[axis], "point outside node box");
            attained_min |= v == min[axis];
            attained_max |= v == max[axis];
        }
        assert!(attained_min && attained_max, "node box is not tight");
    }

    match node.children() {
        None => {
            assert!(node.num_points() >= 1);
            assert_eq!(node.split_axis(), None);
        }
        Some((left, right)) => {
            assert!(node.num_points() > tree.min_leaf_size());
            assert_eq!(left.range().start, node.range().start);
            assert_eq!(left.range().end, right.range().start);
            assert_eq!(right.range().end, node.range().end);
            assert!(left.num_points() > 0 && right.num_points() > 0);

            let axis = node.split_axis().unwrap();
            let value = node.split_value().unwrap();
            for p in left.points().chunks_exact(dimension) {
                assert!(p[axis] < value, "left point not below split value");
            }
            for p in right.points().chunks_exact(dimension) {
                assert!(p[axis] >= value, "right point below split value");
            }
        }
    }
}
