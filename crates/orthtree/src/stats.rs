//! Statistics for refinement passes and tree shape.

use crate::node::NodeIndex;
use crate::traits::OrthtreeTraits;
use crate::traversal::Leaves;
use crate::tree::Orthtree;

/// Statistics from a `refine` or `grade` pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefinementStats {
  /// Number of leaves split during the pass.
  pub nodes_split: usize,
  /// Number of nodes allocated during the pass (`nodes_split * 2^D`).
  pub nodes_created: usize,
}

impl RefinementStats {
  /// Record one split of a node with `degree` children.
  #[inline]
  pub(crate) fn record_split(&mut self, degree: usize) {
    self.nodes_split += 1;
    self.nodes_created += degree;
  }

  /// Combine two passes.
  #[inline]
  pub fn merged(self, other: RefinementStats) -> RefinementStats {
    RefinementStats {
      nodes_split: self.nodes_split + other.nodes_split,
      nodes_created: self.nodes_created + other.nodes_created,
    }
  }
}

/// Snapshot of a tree's shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
  /// Total allocated nodes, internal and leaf.
  pub node_count: usize,
  /// Number of leaves.
  pub leaf_count: usize,
  /// Deepest level reached (root = 0).
  pub max_depth: usize,
  /// Leaf count per depth, indexed by depth.
  pub leaves_per_depth: Vec<usize>,
}

impl TreeStats {
  /// Walk the leaves of `tree` and summarize.
  pub fn collect<T: OrthtreeTraits<D>, const D: usize>(tree: &Orthtree<T, D>) -> Self {
    let mut leaves_per_depth = vec![0usize; tree.tree_depth() + 1];
    let mut leaf_count = 0;
    for leaf in tree.traverse(Leaves) {
      leaves_per_depth[tree.depth(leaf) as usize] += 1;
      leaf_count += 1;
    }
    Self {
      node_count: tree.node_count(),
      leaf_count,
      max_depth: tree.tree_depth(),
      leaves_per_depth,
    }
  }

  /// Number of internal nodes.
  #[inline]
  pub fn internal_count(&self) -> usize {
    self.node_count - self.leaf_count
  }

  /// Leaves at `depth`, or 0 beyond the tree.
  pub fn leaves_at(&self, depth: usize) -> usize {
    self.leaves_per_depth.get(depth).copied().unwrap_or(0)
  }
}

/// Index of the deepest leaf, first in preorder among ties.
pub fn deepest_leaf<T: OrthtreeTraits<D>, const D: usize>(tree: &Orthtree<T, D>) -> NodeIndex {
  tree
    .traverse(Leaves)
    .fold(tree.root(), |best, n| if tree.depth(n) > tree.depth(best) { n } else { best })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_split() {
    let mut stats = RefinementStats::default();
    stats.record_split(4);
    stats.record_split(4);
    assert_eq!(stats.nodes_split, 2);
    assert_eq!(stats.nodes_created, 8);
  }

  #[test]
  fn test_merged() {
    let a = RefinementStats {
      nodes_split: 1,
      nodes_created: 8,
    };
    let b = RefinementStats {
      nodes_split: 3,
      nodes_created: 24,
    };
    let total = a.merged(b);
    assert_eq!(total.nodes_split, 4);
    assert_eq!(total.nodes_created, 32);
  }

  #[test]
  fn test_tree_stats_helpers() {
    let stats = TreeStats {
      node_count: 9,
      leaf_count: 7,
      max_depth: 2,
      leaves_per_depth: vec![0, 3, 4],
    };
    assert_eq!(stats.internal_count(), 2);
    assert_eq!(stats.leaves_at(2), 4);
    assert_eq!(stats.leaves_at(5), 0);
  }
}
