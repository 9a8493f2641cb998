//! Test utilities shared by the unit test modules.
//!
//! Fixture trees and integer-exact geometry checks that do not go through
//! the floating-point boxes under test.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bbox::Bbox;
use crate::node::NodeIndex;
use crate::region::RegionTree;
use crate::traits::OrthtreeTraits;
use crate::traversal::Leaves;
use crate::tree::Orthtree;

// =============================================================================
// Fixtures
// =============================================================================

/// Single-node tree over `[0, side]^D`.
pub fn cube_tree<const D: usize>(side: f64) -> RegionTree<D> {
  RegionTree::<D>::from_bbox(Bbox::new([0.0; D], [side; D]))
}

/// Tree built by `splits` random leaf splits, never deeper than `max_depth`.
pub fn random_tree<const D: usize>(seed: u64, splits: usize, max_depth: u8) -> RegionTree<D> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut tree = cube_tree::<D>(16.0);
  for _ in 0..splits {
    let candidates: Vec<NodeIndex> = tree
      .traverse(Leaves)
      .filter(|&n| tree.depth(n) < max_depth)
      .collect();
    if candidates.is_empty() {
      break;
    }
    let pick = candidates[rng.random_range(0..candidates.len())];
    tree.split(pick);
  }
  tree
}

/// Split the leaf reached by following `path` from the root, splitting every
/// leaf along the way.
pub fn split_path<T, const D: usize>(tree: &mut Orthtree<T, D>, path: &[usize]) -> NodeIndex
where
  T: OrthtreeTraits<D>,
{
  let mut node = tree.root();
  for &slot in path {
    if tree.is_leaf(node) {
      tree.split(node);
    }
    node = tree.child(node, slot);
  }
  node
}

// =============================================================================
// Integer geometry
// =============================================================================

/// Half-open extent of `n` on the grid of depth `finest`, per axis.
pub fn extent<T, const D: usize>(tree: &Orthtree<T, D>, n: NodeIndex, finest: usize) -> [(u64, u64); D]
where
  T: OrthtreeTraits<D>,
{
  let scale = 1u64 << (finest - tree.depth(n) as usize);
  let coordinates = tree.global_coordinates(n);
  std::array::from_fn(|axis| {
    let lo = u64::from(coordinates[axis]) * scale;
    (lo, lo + scale)
  })
}

/// Whether `a` and `b` share a (D-1)-dimensional face.
pub fn face_adjacent<const D: usize>(a: &[(u64, u64); D], b: &[(u64, u64); D]) -> bool {
  (0..D).any(|axis| {
    let touching = a[axis].1 == b[axis].0 || b[axis].1 == a[axis].0;
    touching
      && (0..D)
        .filter(|&other| other != axis)
        .all(|other| a[other].0.max(b[other].0) < a[other].1.min(b[other].1))
  })
}

/// Every pair of face-adjacent leaves whose depths differ by more than 1,
/// as `(finer, coarser)`.
///
/// A coarser leaf touching a face of `n` must contain the same-size cell
/// across that face, so each face only needs the ancestors of that cell
/// looked up in a `(depth, coordinates)` index of the leaves.
pub fn grading_violations<T, const D: usize>(tree: &Orthtree<T, D>) -> Vec<(NodeIndex, NodeIndex)>
where
  T: OrthtreeTraits<D>,
{
  let by_cell: HashMap<(u8, [u32; D]), NodeIndex> = tree
    .traverse(Leaves)
    .map(|n| ((tree.depth(n), tree.global_coordinates(n)), n))
    .collect();

  let mut violations = Vec::new();
  for (&(depth, coordinates), &n) in &by_cell {
    let cells_per_axis = 1u64 << depth;
    for axis in 0..D {
      for positive in [false, true] {
        let c = u64::from(coordinates[axis]);
        if (positive && c + 1 == cells_per_axis) || (!positive && c == 0) {
          continue;
        }
        let mut across = coordinates;
        across[axis] = if positive { coordinates[axis] + 1 } else { coordinates[axis] - 1 };
        for up in 2..=depth {
          let cell = across.map(|x| x >> up);
          if let Some(&coarser) = by_cell.get(&(depth - up, cell)) {
            violations.push((n, coarser));
          }
        }
      }
    }
  }
  violations.sort_unstable();
  violations
}

/// Assert root, leaf flag, parent, depth and coordinate links for every node.
pub fn assert_structure<T, const D: usize>(tree: &Orthtree<T, D>)
where
  T: OrthtreeTraits<D>,
{
  assert!(tree.is_root(tree.root()));
  assert_eq!(tree.depth(tree.root()), 0);

  for n in 0..tree.node_count() {
    assert_eq!(tree.is_leaf(n), tree.children(n).is_none(), "leaf flag of {n}");
    let Some(children) = tree.children(n) else {
      continue;
    };
    assert_eq!(children.len(), Orthtree::<T, D>::DEGREE);
    for (i, c) in children.enumerate() {
      assert_eq!(tree.parent(c), n, "parent of {c}");
      assert_eq!(tree.depth(c), tree.depth(n) + 1, "depth of {c}");
      let parent = tree.global_coordinates(n);
      let child = tree.global_coordinates(c);
      for axis in 0..D {
        let bit = ((i >> axis) & 1) as u32;
        assert_eq!(child[axis], 2 * parent[axis] + bit, "axis {axis} of {c}");
      }
    }
  }
}
