//! Orthtree - arena-backed 2^D-ary spatial subdivision.
//!
//! The tree owns an append-only node arena, its geometry collaborator and the
//! root region. All parent/child/sibling relationships are plain indices into
//! the arena; there are no node pointers.
//!
//! # Contracts
//!
//! Misuse of the structural API is a programming error and panics rather than
//! returning an error:
//! - `split` on a node that is not a leaf
//! - `parent` of the root
//! - `child` of a leaf, or a child slot outside `[0, 2^D)` (debug builds)
//! - `locate` of a point outside the root box (debug builds)
//! - `adjacent_node` along an axis `>= D` (debug builds)

use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::arena::NodeArena;
use crate::bbox::{Bbox, Intersects};
use crate::config::RefineConfig;
use crate::node::{
  child_coordinates, degree, Direction, GlobalCoordinates, LocalCoordinates, NodeIndex,
  MAX_DIMENSION,
};
use crate::properties::{PropertyArray, PropertyError};
use crate::split_predicates;
use crate::stats::RefinementStats;
use crate::traits::{ContainedElements, OrthPoint, OrthtreeTraits};
use crate::traversal::Leaves;

/// Index of the root node.
pub const ROOT: NodeIndex = 0;

/// Deepest level a node may be split into.
///
/// Global coordinates are `u32`, so depth 32 is the last level whose grid
/// still fits.
pub const MAX_DEPTH: u8 = 32;

/// N-dimensional spatial subdivision tree.
///
/// Each internal node has exactly `2^D` children stored contiguously in the
/// arena. The root covers the box from `construct_root_bbox`; each child
/// covers one of the `2^D` congruent halves of its parent.
pub struct Orthtree<T, const D: usize>
where
  T: OrthtreeTraits<D>,
{
  traits: T,
  nodes: NodeArena<T::NodeData, D>,
  bbox: Bbox<D>,
  /// Side lengths of every node at a given depth, halved once per new depth.
  side_per_depth: Vec<[f64; D]>,
}

impl<T, const D: usize> Orthtree<T, D>
where
  T: OrthtreeTraits<D>,
{
  /// Number of children of an internal node.
  pub const DEGREE: usize = degree(D);

  /// Build a single-node tree from a collaborator.
  ///
  /// The root gets the collaborator's root box and root payload. The result
  /// is a fully valid tree; `refine` only adds detail.
  ///
  /// # Panics
  /// If `D` is 0 or larger than `MAX_DIMENSION`.
  pub fn new(traits: T) -> Self {
    assert!(
      D >= 1 && D <= MAX_DIMENSION,
      "Orthtree dimension must be in 1..={MAX_DIMENSION}, got {D}"
    );

    let bbox = traits.construct_root_bbox();
    let mut nodes = NodeArena::new();
    let root = nodes.emplace_group(1);
    *nodes.data_mut(root) = traits.construct_root_contents();

    Self {
      traits,
      nodes,
      side_per_depth: vec![bbox.size()],
      bbox,
    }
  }

  /// Read-only access to the collaborator.
  #[inline]
  pub fn traits(&self) -> &T {
    &self.traits
  }

  /// Index of the root node (always 0).
  #[inline]
  pub fn root(&self) -> NodeIndex {
    ROOT
  }

  /// Region covered by the root node.
  #[inline]
  pub fn root_bbox(&self) -> &Bbox<D> {
    &self.bbox
  }

  /// Deepest level reached by any node (root = 0).
  #[inline]
  pub fn tree_depth(&self) -> usize {
    self.side_per_depth.len() - 1
  }

  /// Total number of nodes, internal and leaf.
  #[inline]
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  // ===========================================================================
  // Node accessors
  // ===========================================================================

  #[inline]
  pub fn is_leaf(&self, n: NodeIndex) -> bool {
    self.nodes.children(n).is_none()
  }

  #[inline]
  pub fn is_root(&self, n: NodeIndex) -> bool {
    n == ROOT
  }

  /// Depth of `n` (root = 0).
  #[inline]
  pub fn depth(&self, n: NodeIndex) -> u8 {
    self.nodes.depth(n)
  }

  #[inline]
  pub fn data(&self, n: NodeIndex) -> &T::NodeData {
    self.nodes.data(n)
  }

  #[inline]
  pub fn data_mut(&mut self, n: NodeIndex) -> &mut T::NodeData {
    self.nodes.data_mut(n)
  }

  /// Grid position of `n` at its own depth.
  #[inline]
  pub fn global_coordinates(&self, n: NodeIndex) -> GlobalCoordinates<D> {
    *self.nodes.coordinates(n)
  }

  /// Position of `n` relative to its parent's center.
  #[inline]
  pub fn local_coordinates(&self, n: NodeIndex) -> LocalCoordinates {
    LocalCoordinates::from_global(self.nodes.coordinates(n))
  }

  /// Parent of `n`.
  ///
  /// # Panics
  /// If `n` is the root.
  #[inline]
  pub fn parent(&self, n: NodeIndex) -> NodeIndex {
    match self.nodes.parent(n) {
      Some(parent) => parent,
      None => panic!("parent() called on the root node"),
    }
  }

  /// The `i`-th child of `n`.
  ///
  /// # Panics
  /// If `n` is a leaf. Debug-asserts `i < 2^D`.
  #[inline]
  pub fn child(&self, n: NodeIndex, i: usize) -> NodeIndex {
    debug_assert!(i < Self::DEGREE, "child slot {i} out of range for degree {}", Self::DEGREE);
    match self.nodes.children(n) {
      Some(first) => first + i,
      None => panic!("child() called on leaf node {n}"),
    }
  }

  /// Indices of all children of `n`, or `None` for a leaf.
  #[inline]
  pub fn children(&self, n: NodeIndex) -> Option<Range<NodeIndex>> {
    self
      .nodes
      .children(n)
      .map(|first| first..first + Self::DEGREE)
  }

  /// Follow a path of child slots down from `n`.
  ///
  /// `descendant(n, &[0, 1])` is the second child of the first child of `n`.
  pub fn descendant(&self, n: NodeIndex, path: &[usize]) -> NodeIndex {
    path.iter().fold(n, |node, &i| self.child(node, i))
  }

  /// Follow a path of child slots down from the root.
  pub fn node(&self, path: &[usize]) -> NodeIndex {
    self.descendant(ROOT, path)
  }

  /// Next sibling of `n` in local-coordinate order, if any.
  pub fn next_sibling(&self, n: NodeIndex) -> Option<NodeIndex> {
    let parent = self.nodes.parent(n)?;
    let local = self.local_coordinates(n).index();
    if local + 1 == Self::DEGREE {
      return None;
    }
    Some(self.child(parent, local + 1))
  }

  /// Next sibling of the closest ancestor of `n` that has one.
  pub fn next_sibling_up(&self, n: NodeIndex) -> Option<NodeIndex> {
    let mut up = self.nodes.parent(n);
    while let Some(node) = up {
      if let Some(next) = self.next_sibling(node) {
        return Some(next);
      }
      up = self.nodes.parent(node);
    }
    None
  }

  /// Leaf reached by always descending into child 0.
  pub fn deepest_first_child(&self, n: NodeIndex) -> NodeIndex {
    let mut first = n;
    while let Some(child) = self.nodes.children(first) {
      first = child;
    }
    first
  }

  /// First node at depth `depth` in the subtree of `n`, in preorder.
  ///
  /// `None` when the subtree does not reach that depth.
  pub fn first_child_at_depth(&self, n: NodeIndex, depth: usize) -> Option<NodeIndex> {
    let mut stack: SmallVec<[NodeIndex; 32]> = SmallVec::new();
    stack.push(n);
    while let Some(node) = stack.pop() {
      let node_depth = self.depth(node) as usize;
      if node_depth == depth {
        return Some(node);
      }
      if node_depth < depth {
        if let Some(children) = self.children(node) {
          stack.extend(children.rev());
        }
      }
    }
    None
  }

  // ===========================================================================
  // Geometry
  // ===========================================================================

  /// Region covered by `n`.
  ///
  /// This is the box of the node itself, not of its contents. The last cell
  /// along each axis snaps to the root's max corner so that rounding never
  /// leaves a gap at the boundary.
  pub fn bbox(&self, n: NodeIndex) -> Bbox<D> {
    let depth = self.depth(n) as usize;
    let size = &self.side_per_depth[depth];
    let last = (1u64 << depth) - 1;
    let coordinates = self.nodes.coordinates(n);

    let mut min = [0.0; D];
    let mut max = [0.0; D];
    for axis in 0..D {
      let c = coordinates[axis];
      min[axis] = self.bbox.min[axis] + f64::from(c) * size[axis];
      max[axis] = if u64::from(c) == last {
        self.bbox.max[axis]
      } else {
        self.bbox.min[axis] + f64::from(c + 1) * size[axis]
      };
    }
    Bbox { min, max }
  }

  /// Center of the region covered by `n`.
  pub fn barycenter(&self, n: NodeIndex) -> T::Point {
    self.traits.construct_point(self.barycenter_coordinates(n))
  }

  fn barycenter_coordinates(&self, n: NodeIndex) -> [f64; D] {
    let size = &self.side_per_depth[self.depth(n) as usize];
    let coordinates = self.nodes.coordinates(n);
    std::array::from_fn(|axis| {
      let twice = 2.0 * f64::from(coordinates[axis]) + 1.0;
      self.bbox.min[axis] + twice * (size[axis] / 2.0)
    })
  }

  // ===========================================================================
  // Construction
  // ===========================================================================

  /// Split leaf `n` into `2^D` children.
  ///
  /// Children get their depth, parent and coordinates; the collaborator then
  /// distributes `n`'s payload among them.
  ///
  /// # Panics
  /// If `n` is not a leaf, or is already at `MAX_DEPTH`.
  pub fn split(&mut self, n: NodeIndex) {
    assert!(self.is_leaf(n), "split() called on non-leaf node {n}");
    let depth = self.depth(n);
    assert!(depth < MAX_DEPTH, "split() called on node {n} at maximum depth {MAX_DEPTH}");

    let first = self.nodes.emplace_group(Self::DEGREE);
    self.nodes.set_children(n, Some(first));

    let coordinates = *self.nodes.coordinates(n);
    for i in 0..Self::DEGREE {
      let c = first + i;
      self
        .nodes
        .set_coordinates(c, child_coordinates(&coordinates, LocalCoordinates::from(i)));
      self.nodes.set_depth(c, depth + 1);
      self.nodes.set_parent(c, Some(n));
    }

    // First node at a new depth: extend the size cache by halving.
    if depth as usize + 1 == self.side_per_depth.len() {
      let size = self.side_per_depth[depth as usize];
      self.side_per_depth.push(size.map(|s| s / 2.0));
    }

    tracing::trace!(node = n, first_child = first, depth = depth + 1, "split node");

    let center = self.barycenter(n);
    T::distribute_node_contents(self, n, &center);
  }

  /// Split leaves breadth-first while `predicate` selects them.
  ///
  /// Starts at the root. Nodes that are already internal are left alone and
  /// their children visited, so repeated calls with different predicates only
  /// refine further. Leaves at `MAX_DEPTH` are never offered to `predicate`.
  #[tracing::instrument(skip_all, name = "orthtree::refine")]
  pub fn refine<P>(&mut self, mut predicate: P) -> RefinementStats
  where
    P: FnMut(NodeIndex, &Self) -> bool,
  {
    let mut stats = RefinementStats::default();
    let mut todo = VecDeque::from([ROOT]);

    while let Some(current) = todo.pop_front() {
      if self.is_leaf(current) && self.depth(current) < MAX_DEPTH && predicate(current, &*self) {
        self.split(current);
        stats.record_split(Self::DEGREE);
      }
      if let Some(children) = self.children(current) {
        todo.extend(children);
      }
    }

    tracing::debug!(
      nodes_split = stats.nodes_split,
      node_count = self.node_count(),
      depth = self.tree_depth(),
      "refine complete"
    );
    stats
  }

  /// Refine until leaves hold at most `bucket_size` elements or reach
  /// `max_depth`.
  pub fn refine_to(&mut self, max_depth: usize, bucket_size: usize) -> RefinementStats
  where
    T::NodeData: ContainedElements,
  {
    self.refine_with(RefineConfig::new(max_depth, bucket_size))
  }

  /// `refine_to` driven by a `RefineConfig`.
  pub fn refine_with(&mut self, config: RefineConfig) -> RefinementStats
  where
    T::NodeData: ContainedElements,
  {
    self.refine(split_predicates::maximum_depth_and_maximum_contained_elements::<T, D>(
      config.max_depth,
      config.bucket_size,
    ))
  }

  /// Enforce 2:1 balance between face-adjacent leaves.
  ///
  /// Only splits; nothing is ever merged. Newly created children are
  /// re-examined since a split can unbalance a further neighbor.
  #[tracing::instrument(skip_all, name = "orthtree::grade")]
  pub fn grade(&mut self) -> RefinementStats {
    let mut stats = RefinementStats::default();
    let mut leaves: VecDeque<NodeIndex> = {
      let _span = tracing::info_span!("collect_leaves").entered();
      self.traverse(Leaves).collect()
    };

    let _span = tracing::info_span!("balance", queued = leaves.len()).entered();
    while let Some(node) = leaves.pop_front() {
      if !self.is_leaf(node) {
        continue;
      }

      for direction in Direction::all(D) {
        // Each split brings the face neighbor one level closer; keep going
        // until the gap across this face is at most 1.
        while let Some(neighbor) = self.adjacent_node(node, direction) {
          // Siblings share a depth.
          if self.nodes.parent(neighbor) == self.nodes.parent(node)
            || !self.is_leaf(neighbor)
            || self.depth(node).saturating_sub(self.depth(neighbor)) <= 1
          {
            break;
          }
          self.split(neighbor);
          stats.record_split(Self::DEGREE);
          if let Some(children) = self.children(neighbor) {
            leaves.extend(children);
          }
        }
      }
    }

    tracing::debug!(nodes_split = stats.nodes_split, "grade complete");
    stats
  }

  // ===========================================================================
  // Queries
  // ===========================================================================

  /// Leaf whose region contains `point`.
  ///
  /// Descends from the root choosing, per axis, the half the collaborator's
  /// `locate_halfspace` selects.
  ///
  /// Debug-asserts that `point` lies inside the root box.
  pub fn locate(&self, point: &T::Point) -> NodeIndex {
    let coordinates = point.coordinates();
    debug_assert!(
      self.bbox.contains_point(&coordinates),
      "locate() point {coordinates:?} lies outside the root box"
    );

    let mut node = ROOT;
    while let Some(first) = self.nodes.children(node) {
      let center = self.barycenter_coordinates(node);
      let local = (0..D).fold(LocalCoordinates::default(), |local, axis| {
        local.with_axis(
          axis,
          self.traits.locate_halfspace(center[axis], coordinates[axis]),
        )
      });
      node = first + local.index();
    }
    node
  }

  /// `locate` for many points in parallel.
  ///
  /// Results are in the same order as `points`.
  #[tracing::instrument(skip_all, name = "orthtree::locate_all", fields(points = points.len()))]
  pub fn locate_all(&self, points: &[T::Point]) -> Vec<NodeIndex>
  where
    Self: Sync,
    T::Point: Sync,
  {
    points.par_iter().map(|p| self.locate(p)).collect()
  }

  /// Append every leaf whose region intersects `query` to `output`, in
  /// preorder.
  ///
  /// Subtrees whose region misses the query are skipped entirely.
  pub fn intersected_nodes<Q, E>(&self, query: &Q, output: &mut E)
  where
    Q: Intersects<D> + ?Sized,
    E: Extend<NodeIndex>,
  {
    let mut stack: SmallVec<[NodeIndex; 32]> = SmallVec::new();
    stack.push(ROOT);
    while let Some(node) = stack.pop() {
      if !query.intersects(&self.bbox(node)) {
        continue;
      }
      match self.children(node) {
        Some(children) => stack.extend(children.rev()),
        None => output.extend(std::iter::once(node)),
      }
    }
  }

  /// `intersected_nodes` collected into a `Vec`.
  pub fn intersected<Q>(&self, query: &Q) -> Vec<NodeIndex>
  where
    Q: Intersects<D> + ?Sized,
  {
    let mut out = Vec::new();
    self.intersected_nodes(query, &mut out);
    out
  }

  // ===========================================================================
  // Topology
  // ===========================================================================

  /// Whether the subtrees at `lhs_node` and `rhs_node` have the same shape
  /// and coordinates. Payloads are ignored.
  pub fn is_subtree_topology_equal(
    lhs_tree: &Self,
    lhs_node: NodeIndex,
    rhs_tree: &Self,
    rhs_node: NodeIndex,
  ) -> bool {
    let mut stack = vec![(lhs_node, rhs_node)];
    while let Some((l, r)) = stack.pop() {
      if lhs_tree.global_coordinates(l) != rhs_tree.global_coordinates(r) {
        return false;
      }
      match (lhs_tree.children(l), rhs_tree.children(r)) {
        (None, None) => {}
        (Some(lc), Some(rc)) => stack.extend(lc.zip(rc)),
        _ => return false,
      }
    }
    true
  }

  /// Whether two whole trees have the same shape and coordinates.
  pub fn is_topology_equal(lhs: &Self, rhs: &Self) -> bool {
    Self::is_subtree_topology_equal(lhs, ROOT, rhs, ROOT)
  }

  // ===========================================================================
  // Named properties
  // ===========================================================================

  /// Register a new per-node property. Every existing node gets `default`.
  pub fn add_node_property<V>(
    &mut self,
    name: &str,
    default: V,
  ) -> Result<&mut PropertyArray<V>, PropertyError>
  where
    V: Clone + Send + Sync + 'static,
  {
    self.nodes.properties.add(name, default)
  }

  /// Fetch a property, registering it first if needed.
  ///
  /// The flag is `true` when the property was created by this call.
  pub fn get_or_add_node_property<V>(
    &mut self,
    name: &str,
    default: V,
  ) -> Result<(&mut PropertyArray<V>, bool), PropertyError>
  where
    V: Clone + Send + Sync + 'static,
  {
    self.nodes.properties.get_or_add(name, default)
  }

  pub fn node_property<V: 'static>(&self, name: &str) -> Result<&PropertyArray<V>, PropertyError> {
    self.nodes.properties.get(name)
  }

  pub fn node_property_mut<V: 'static>(
    &mut self,
    name: &str,
  ) -> Result<&mut PropertyArray<V>, PropertyError> {
    self.nodes.properties.get_mut(name)
  }

  pub fn has_node_property(&self, name: &str) -> bool {
    self.nodes.properties.contains(name)
  }

  /// Drop a property. Returns whether it existed.
  pub fn remove_node_property(&mut self, name: &str) -> bool {
    self.nodes.properties.remove(name)
  }

  pub fn node_property_names(&self) -> impl Iterator<Item = &str> {
    self.nodes.properties.names()
  }
}

impl<T, const D: usize> PartialEq for Orthtree<T, D>
where
  T: OrthtreeTraits<D>,
{
  /// Topological equality: same root box, same depth, same node structure.
  fn eq(&self, other: &Self) -> bool {
    self.bbox == other.bbox
      && self.side_per_depth[0] == other.side_per_depth[0]
      && self.tree_depth() == other.tree_depth()
      && Self::is_topology_equal(self, other)
  }
}

impl<T, const D: usize> Clone for Orthtree<T, D>
where
  T: OrthtreeTraits<D> + Clone,
  T::NodeData: Clone,
{
  fn clone(&self) -> Self {
    Self {
      traits: self.traits.clone(),
      nodes: self.nodes.clone(),
      bbox: self.bbox,
      side_per_depth: self.side_per_depth.clone(),
    }
  }
}

impl<T, const D: usize> fmt::Debug for Orthtree<T, D>
where
  T: OrthtreeTraits<D>,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Orthtree")
      .field("dimension", &D)
      .field("bbox", &self.bbox)
      .field("node_count", &self.node_count())
      .field("depth", &self.tree_depth())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
