//! NodeArena - append-only structure-of-arrays node storage.
//!
//! Every node attribute lives in its own array keyed by `NodeIndex`. Nodes are
//! only ever allocated in contiguous groups and never freed, so an index stays
//! valid (and keeps its meaning) for the lifetime of the arena.

use crate::node::{GlobalCoordinates, NodeIndex};
use crate::properties::PropertyContainer;

/// Append-only node storage.
#[derive(Clone, Debug)]
pub struct NodeArena<T, const D: usize> {
  depths: Vec<u8>,
  coordinates: Vec<GlobalCoordinates<D>>,
  parents: Vec<Option<NodeIndex>>,
  children: Vec<Option<NodeIndex>>,
  data: Vec<T>,
  pub(crate) properties: PropertyContainer,
}

impl<T: Default, const D: usize> NodeArena<T, D> {
  /// Empty arena. Trees allocate the root immediately after.
  pub fn new() -> Self {
    Self {
      depths: Vec::new(),
      coordinates: Vec::new(),
      parents: Vec::new(),
      children: Vec::new(),
      data: Vec::new(),
      properties: PropertyContainer::new(),
    }
  }

  /// Allocate `count` contiguous nodes with default attributes.
  ///
  /// Returns the index of the first one.
  pub fn emplace_group(&mut self, count: usize) -> NodeIndex {
    let first = self.len();
    let len = first + count;
    self.depths.resize(len, 0);
    self.coordinates.resize(len, [0; D]);
    self.parents.resize(len, None);
    self.children.resize(len, None);
    self.data.resize_with(len, T::default);
    self.properties.grow(count);
    first
  }
}

impl<T: Default, const D: usize> Default for NodeArena<T, D> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T, const D: usize> NodeArena<T, D> {
  /// Number of allocated nodes.
  #[inline]
  pub fn len(&self) -> usize {
    self.depths.len()
  }

  /// Check if empty.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.depths.is_empty()
  }

  #[inline]
  pub fn depth(&self, n: NodeIndex) -> u8 {
    self.depths[n]
  }

  #[inline]
  pub fn set_depth(&mut self, n: NodeIndex, depth: u8) {
    self.depths[n] = depth;
  }

  #[inline]
  pub fn coordinates(&self, n: NodeIndex) -> &GlobalCoordinates<D> {
    &self.coordinates[n]
  }

  #[inline]
  pub fn set_coordinates(&mut self, n: NodeIndex, coordinates: GlobalCoordinates<D>) {
    self.coordinates[n] = coordinates;
  }

  #[inline]
  pub fn parent(&self, n: NodeIndex) -> Option<NodeIndex> {
    self.parents[n]
  }

  #[inline]
  pub fn set_parent(&mut self, n: NodeIndex, parent: Option<NodeIndex>) {
    self.parents[n] = parent;
  }

  /// First child of `n`, if it has been split.
  #[inline]
  pub fn children(&self, n: NodeIndex) -> Option<NodeIndex> {
    self.children[n]
  }

  #[inline]
  pub fn set_children(&mut self, n: NodeIndex, first_child: Option<NodeIndex>) {
    self.children[n] = first_child;
  }

  #[inline]
  pub fn data(&self, n: NodeIndex) -> &T {
    &self.data[n]
  }

  #[inline]
  pub fn data_mut(&mut self, n: NodeIndex) -> &mut T {
    &mut self.data[n]
  }
}
