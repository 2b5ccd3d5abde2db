use crate::kdtree::{KDTree, KDTreeBuilder};
use crate::test::{check_tree, random_points, sample_points};
use crate::KDTreeError;

fn make_index() -> KDTree<f64> {
    KDTree::try_new(&sample_points(), 2, 2).unwrap()
}

#[test]
fn creates_an_index() {
    let points = sample_points();
    let tree = make_index();

    assert_eq!(tree.num_points(), 16);
    assert_eq!(tree.dimension(), 2);
    assert_eq!(tree.num_nodes(), 17);
    assert_eq!(check_tree(&tree, &points), 17);

    let expected_order = vec![9, 0, 1, 12, 6, 15, 3, 10, 14, 5, 4, 11, 7, 2, 8, 13];
    assert_eq!(tree.order(), expected_order, "order is kd-sorted");
}

#[test]
fn root_splits_on_widest_axis() {
    let tree = make_index();
    let root = tree.root();

    // x spans [-1, 12], y spans [0, 10]
    assert_eq!(root.min(), &[-1., 0.]);
    assert_eq!(root.max(), &[12., 10.]);
    assert_eq!(root.split_axis(), Some(0));
    assert_eq!(root.split_value(), Some(6.));

    let (left, right) = root.children().unwrap();
    assert_eq!(left.range(), 0..8);
    assert_eq!(right.range(), 8..16);
}

#[test]
fn leaves_respect_min_leaf_size() {
    let tree = make_index();
    let mut stack = vec![tree.root()];
    let mut num_leaves = 0;
    while let Some(node) = stack.pop() {
        match node.children() {
            Some((left, right)) => {
                stack.push(left);
                stack.push(right);
            }
            None => {
                num_leaves += 1;
                assert!(node.num_points() <= 2);
            }
        }
    }
    assert_eq!(num_leaves, 9);
}

#[test]
fn all_identical_points_make_a_single_leaf() {
    let points = [5., 5., 5., 5., 5., 5., 5., 5.];
    let tree = KDTree::<f64>::try_new(&points, 2, 1).unwrap();
    let root = tree.root();
    assert!(root.is_leaf());
    assert_eq!(root.num_points(), 4);
    assert_eq!(tree.num_nodes(), 1);
    assert_eq!(tree.depth(), 1);
}

#[test]
fn identical_points_on_one_axis() {
    let points = [1., 10., 1., 20., 1., 5., 1., 15.];
    let tree = KDTree::<f64>::try_new(&points, 2, 1).unwrap();
    // x has no spread, so the root must split on y
    assert_eq!(tree.root().split_axis(), Some(1));
    check_tree(&tree, &points);
}

#[test]
fn one_dimensional_points() {
    let points = [10., 5., 20., 15., 2.];
    let tree = KDTree::<f64>::try_new(&points, 1, 1).unwrap();
    assert_eq!(tree.root().split_axis(), Some(0));
    check_tree(&tree, &points);

    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        if let Some((left, right)) = node.children() {
            assert_eq!(node.split_axis(), Some(0));
            stack.push(left);
            stack.push(right);
        }
    }
}

#[test]
fn small_leaf_size_splits_aggressively() {
    let points = [1., 1., 2., 2., 3., 3.];
    let tree = KDTree::<f64>::try_new(&points, 2, 1).unwrap();
    assert!(tree.root().left_child().is_some());
    assert!(tree.root().right_child().is_some());
    check_tree(&tree, &points);
}

#[test]
fn empty_points_are_rejected() {
    let result = KDTree::<f64>::try_new(&[], 2, 2);
    assert!(matches!(result, Err(KDTreeError::InvalidArgument(_))));
}

#[test]
fn random_trees_hold_invariants() {
    for (dimension, min_leaf_size) in [(1, 1), (2, 4), (3, 16), (5, 7)] {
        let points = random_points::<f32>(2000, dimension, dimension as u64);
        let tree = KDTreeBuilder::new_with_min_leaf_size(dimension, min_leaf_size)
            .build(&points)
            .unwrap();
        check_tree(&tree, &points);
        // roughly balanced on uniform data
        assert!(tree.depth() < 30);
    }
}

#[test]
fn large_duplicate_heavy_input() {
    // every value appears twice, so most medians are shared by two points
    let points: Vec<f64> = (0..200_000).map(|i| (i / 2) as f64).collect();
    let tree = KDTree::try_new(&points, 1, 1).unwrap();
    assert_eq!(tree.num_points(), 200_000);
    check_tree(&tree, &points);
}

#[test]
fn display_lists_leaves() {
    let tree = make_index();
    let text = tree.to_string();
    assert!(text.starts_with("KDTree (num_points: 16, dimension: 2):"));
    assert!(text.contains("Root node (axis: 0, value: 6"));
    assert!(text.contains("(original index: 13)"));
}
