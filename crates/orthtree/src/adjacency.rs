//! Face-neighbor lookup.
//!
//! Adjacent nodes follow three rules:
//! - a neighbor may be larger (coarser) than the seek node, never smaller
//! - a node has at most `2 * D` neighbors, one per face direction
//! - a neighbor need not be a leaf
//!
//! ```text
//! +---------------+---------------+
//! |               |               |
//! |       A       |               |
//! |               |               |
//! +-------+-------+---+---+-------+
//! |       |       |   |   |       |
//! |   A   |  (S)  +---A---+       |
//! |       |       |   |   |       |
//! +---+---+-------+---+---+-------+
//! |   |   |       |       |       |
//! +---+---+   A   |       |       |
//! |   |   |       |       |       |
//! +---+---+-------+-------+-------+
//! ```
//!
//! (S) is the seek node, A its neighbors. The top neighbor is coarser; the
//! right neighbor has the same size even though it is subdivided further.

use smallvec::SmallVec;

use crate::node::{Adjacency, Direction, NodeIndex};
use crate::traits::OrthtreeTraits;
use crate::tree::Orthtree;

impl<T, const D: usize> Orthtree<T, D>
where
  T: OrthtreeTraits<D>,
{
  /// Node sharing `n`'s face in `direction`, no smaller than `n`.
  ///
  /// `None` for the root and for faces on the boundary of the root box.
  /// Walks parent links up only as far as the first common ancestor, so the
  /// cost is O(depth).
  ///
  /// Debug-asserts that the direction's axis is `< D`.
  pub fn adjacent_node(&self, n: NodeIndex, direction: Direction) -> Option<NodeIndex> {
    debug_assert!(
      direction.axis() < D,
      "direction axis {} out of range for a {}-dimensional tree",
      direction.axis(),
      D
    );

    // Climb until the face is interior to some parent.
    let mut path: SmallVec<[NodeIndex; 32]> = SmallVec::new();
    let mut current = n;
    let axis = direction.axis();
    let positive = direction.is_positive();
    let offset = 1usize << axis;

    let mut neighbor = loop {
      if self.is_root(current) {
        return None;
      }
      let local = self.local_coordinates(current);
      if local.is_greater(axis) != positive {
        // On the side of the parent facing `direction`: the sibling across
        // the shared face is the answer at this level.
        let sibling_slot = if positive {
          local.index() + offset
        } else {
          local.index() - offset
        };
        break self.child(self.parent(current), sibling_slot);
      }
      path.push(current);
      current = self.parent(current);
    };

    // Descend back down, mirroring each step across the face, stopping at
    // the first leaf.
    while let Some(step) = path.pop() {
      if self.is_leaf(neighbor) {
        break;
      }
      let local = self.local_coordinates(step).index();
      let mirrored = if positive { local - offset } else { local + offset };
      neighbor = self.child(neighbor, mirrored);
    }

    Some(neighbor)
  }

  /// `adjacent_node` with a named direction.
  #[inline]
  pub fn adjacent_node_of(&self, n: NodeIndex, adjacency: Adjacency) -> Option<NodeIndex> {
    self.adjacent_node(n, adjacency.into())
  }
}

#[cfg(test)]
#[path = "adjacency_test.rs"]
mod adjacency_test;
