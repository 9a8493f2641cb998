//! Traversal strategies - lazy, restartable node orders.
//!
//! A strategy is a pair of state transitions over node indices: where to
//! start (`first_index`) and where to go from a node (`next_index`). The
//! iterator keeps only the current node. `Preorder`, `Postorder` and `Leaves`
//! step purely along the arena's parent/child links; `Level` probes each
//! candidate subtree with `first_child_at_depth`, which uses a small
//! depth-bounded stack.
//!
//! ```ignore
//! for leaf in tree.traverse(Leaves) {
//!   println!("{:?}", tree.bbox(leaf));
//! }
//! ```

use std::iter::FusedIterator;

use crate::node::NodeIndex;
use crate::traits::OrthtreeTraits;
use crate::tree::Orthtree;

/// A linear order over the nodes of a tree.
pub trait Traversal {
  /// First node of the sequence, `None` for an empty sequence.
  fn first_index<T, const D: usize>(&self, tree: &Orthtree<T, D>) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>;

  /// Node following `n`, `None` at the end.
  fn next_index<T, const D: usize>(&self, tree: &Orthtree<T, D>, n: NodeIndex) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>;
}

/// Parents before children, children in local-coordinate order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preorder;

impl Traversal for Preorder {
  fn first_index<T, const D: usize>(&self, tree: &Orthtree<T, D>) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>,
  {
    Some(tree.root())
  }

  fn next_index<T, const D: usize>(&self, tree: &Orthtree<T, D>, n: NodeIndex) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>,
  {
    if tree.is_leaf(n) {
      tree.next_sibling(n).or_else(|| tree.next_sibling_up(n))
    } else {
      Some(tree.child(n, 0))
    }
  }
}

/// Children before parents; the root comes last.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Postorder;

impl Traversal for Postorder {
  fn first_index<T, const D: usize>(&self, tree: &Orthtree<T, D>) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>,
  {
    Some(tree.deepest_first_child(tree.root()))
  }

  fn next_index<T, const D: usize>(&self, tree: &Orthtree<T, D>, n: NodeIndex) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>,
  {
    if tree.is_root(n) {
      return None;
    }
    match tree.next_sibling(n) {
      Some(sibling) => Some(tree.deepest_first_child(sibling)),
      None => Some(tree.parent(n)),
    }
  }
}

/// Leaves only, in preorder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Leaves;

impl Traversal for Leaves {
  fn first_index<T, const D: usize>(&self, tree: &Orthtree<T, D>) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>,
  {
    Some(tree.deepest_first_child(tree.root()))
  }

  fn next_index<T, const D: usize>(&self, tree: &Orthtree<T, D>, n: NodeIndex) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>,
  {
    tree
      .next_sibling(n)
      .or_else(|| tree.next_sibling_up(n))
      .map(|next| tree.deepest_first_child(next))
  }
}

/// Nodes at exactly one depth, in preorder.
///
/// Empty when the tree does not reach that depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Level {
  pub depth: usize,
}

impl Level {
  pub const fn new(depth: usize) -> Self {
    Self { depth }
  }
}

impl Traversal for Level {
  fn first_index<T, const D: usize>(&self, tree: &Orthtree<T, D>) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>,
  {
    tree.first_child_at_depth(tree.root(), self.depth)
  }

  fn next_index<T, const D: usize>(&self, tree: &Orthtree<T, D>, n: NodeIndex) -> Option<NodeIndex>
  where
    T: OrthtreeTraits<D>,
  {
    // Walk subtrees that follow `n` in preorder until one reaches the level.
    let mut cursor = n;
    loop {
      cursor = tree
        .next_sibling(cursor)
        .or_else(|| tree.next_sibling_up(cursor))?;
      if let Some(found) = tree.first_child_at_depth(cursor, self.depth) {
        return Some(found);
      }
    }
  }
}

/// Lazy sequence of node indices produced by a `Traversal`.
///
/// Single-pass and forward-only; `restart` rewinds to the first node.
pub struct Traverse<'a, T, S, const D: usize>
where
  T: OrthtreeTraits<D>,
{
  tree: &'a Orthtree<T, D>,
  strategy: S,
  next: Option<NodeIndex>,
}

impl<'a, T, S, const D: usize> Traverse<'a, T, S, D>
where
  T: OrthtreeTraits<D>,
  S: Traversal,
{
  fn new(tree: &'a Orthtree<T, D>, strategy: S) -> Self {
    let next = strategy.first_index(tree);
    Self {
      tree,
      strategy,
      next,
    }
  }

  /// Rewind to the first node of the sequence.
  pub fn restart(&mut self) {
    self.next = self.strategy.first_index(self.tree);
  }
}

impl<T, S, const D: usize> Iterator for Traverse<'_, T, S, D>
where
  T: OrthtreeTraits<D>,
  S: Traversal,
{
  type Item = NodeIndex;

  fn next(&mut self) -> Option<NodeIndex> {
    let current = self.next?;
    self.next = self.strategy.next_index(self.tree, current);
    Some(current)
  }
}

impl<T, S, const D: usize> FusedIterator for Traverse<'_, T, S, D>
where
  T: OrthtreeTraits<D>,
  S: Traversal,
{
}

impl<T, const D: usize> Orthtree<T, D>
where
  T: OrthtreeTraits<D>,
{
  /// Iterate over node indices in the order defined by `strategy`.
  ///
  /// The sequence reflects the tree at the time of each step; the borrow
  /// keeps the tree from being split underneath it.
  pub fn traverse<S: Traversal>(&self, strategy: S) -> Traverse<'_, T, S, D> {
    Traverse::new(self, strategy)
  }
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod traversal_test;
