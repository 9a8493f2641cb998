use super::*;
use crate::region::RegionTree;
use crate::test_utils::{cube_tree, extent, face_adjacent, random_tree, split_path};

#[test]
fn test_root_has_no_neighbors() {
  let tree = cube_tree::<3>(1.0);
  for direction in Direction::all(3) {
    assert_eq!(tree.adjacent_node(tree.root(), direction), None);
  }
}

#[test]
fn test_siblings_and_boundary() {
  let mut tree = cube_tree::<2>(1.0);
  tree.split(tree.root());
  let [c0, c1, c2, c3] = [0, 1, 2, 3].map(|i| tree.child(tree.root(), i));

  assert_eq!(tree.adjacent_node_of(c0, Adjacency::Right), Some(c1));
  assert_eq!(tree.adjacent_node_of(c0, Adjacency::Up), Some(c2));
  assert_eq!(tree.adjacent_node_of(c3, Adjacency::Left), Some(c2));
  assert_eq!(tree.adjacent_node_of(c3, Adjacency::Down), Some(c1));

  assert_eq!(tree.adjacent_node_of(c0, Adjacency::Left), None);
  assert_eq!(tree.adjacent_node_of(c0, Adjacency::Down), None);
  assert_eq!(tree.adjacent_node_of(c3, Adjacency::Right), None);
  assert_eq!(tree.adjacent_node_of(c3, Adjacency::Up), None);
}

#[test]
fn test_coarser_neighbor() {
  let mut tree = cube_tree::<2>(1.0);
  let n = split_path(&mut tree, &[0, 1]);

  // Right of [0, 1] crosses into quadrant 1, which is a leaf.
  assert_eq!(tree.adjacent_node_of(n, Adjacency::Right), Some(tree.node(&[1])));
  // Up stays inside quadrant 0.
  assert_eq!(tree.adjacent_node_of(n, Adjacency::Up), Some(tree.node(&[0, 3])));
  assert_eq!(tree.adjacent_node_of(n, Adjacency::Down), None);
}

#[test]
fn test_same_size_neighbor_across_parents() {
  let mut tree = cube_tree::<2>(1.0);
  split_path(&mut tree, &[0, 1]);
  split_path(&mut tree, &[1, 0, 0]);

  // [1, 0] is internal but the same size as [0, 1]; descent stops there.
  let n = tree.node(&[0, 1]);
  assert_eq!(tree.adjacent_node_of(n, Adjacency::Right), Some(tree.node(&[1, 0])));
  assert!(!tree.is_leaf(tree.node(&[1, 0])));

  // And back again.
  let m = tree.node(&[1, 0]);
  assert_eq!(tree.adjacent_node_of(m, Adjacency::Left), Some(n));
}

#[test]
fn test_deep_mirrored_descent() {
  let mut tree = cube_tree::<2>(1.0);
  split_path(&mut tree, &[0, 3, 1]);
  split_path(&mut tree, &[1, 2, 0]);

  // Both at depth 3, touching across the vertical center line.
  let a = tree.node(&[0, 3, 1]);
  let b = tree.node(&[1, 2, 0]);
  assert_eq!(tree.adjacent_node_of(a, Adjacency::Right), Some(b));
  assert_eq!(tree.adjacent_node_of(b, Adjacency::Left), Some(a));
}

#[test]
fn test_3d_named_directions() {
  let mut tree = cube_tree::<3>(1.0);
  tree.split(tree.root());
  let c0 = tree.child(tree.root(), 0);

  assert_eq!(tree.adjacent_node_of(c0, Adjacency::Right), Some(tree.child(tree.root(), 1)));
  assert_eq!(tree.adjacent_node_of(c0, Adjacency::Up), Some(tree.child(tree.root(), 2)));
  assert_eq!(tree.adjacent_node_of(c0, Adjacency::Front), Some(tree.child(tree.root(), 4)));
  assert_eq!(tree.adjacent_node_of(c0, Adjacency::Back), None);

  let c7 = tree.child(tree.root(), 7);
  assert_eq!(tree.adjacent_node_of(c7, Adjacency::Back), Some(tree.child(tree.root(), 3)));
}

#[test]
fn test_neighbors_on_random_trees() {
  for seed in 0..6 {
    check_neighbors(&random_tree::<2>(seed, 40, 6));
    check_neighbors(&random_tree::<3>(seed, 15, 4));
  }
}

/// The neighbor is no deeper, shares the face, and is missing exactly when
/// the face is on the root boundary.
fn check_neighbors<const D: usize>(tree: &RegionTree<D>) {
  let finest = tree.tree_depth();
  let side = 1u64 << finest;

  for n in 0..tree.node_count() {
    let en = extent(tree, n, finest);
    for direction in Direction::all(D) {
      let axis = direction.axis();
      let on_boundary = if direction.is_positive() {
        en[axis].1 == side
      } else {
        en[axis].0 == 0
      };

      match tree.adjacent_node(n, direction) {
        None => assert!(on_boundary, "node {n} lost its {direction:?} neighbor"),
        Some(m) => {
          assert!(!on_boundary);
          assert!(tree.depth(m) <= tree.depth(n));
          let em = extent(tree, m, finest);
          assert!(face_adjacent(&en, &em), "{n} and {m} do not touch");
          let touching = if direction.is_positive() {
            em[axis].0 == en[axis].1
          } else {
            em[axis].1 == en[axis].0
          };
          assert!(touching, "{m} is on the wrong side of {n}");
          // Either the same size, or a coarser leaf.
          assert!(tree.depth(m) == tree.depth(n) || tree.is_leaf(m));
        }
      }
    }
  }
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn test_axis_out_of_range_panics() {
  let mut tree = cube_tree::<2>(1.0);
  tree.split(tree.root());
  tree.adjacent_node(tree.child(tree.root(), 0), Direction::new(2, true));
}
