//! PointSetTraits - the classic point-cloud quadtree/octree.
//!
//! The collaborator owns the points; each node's payload is the list of
//! indices of the points inside it. Splitting partitions the parent's list
//! among the children with the same half-space test `locate` uses, so a point
//! always ends up in the leaf `locate` returns for it. The parent keeps its
//! own list.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::{DVec2, DVec3};
use smallvec::SmallVec;

use crate::bbox::Bbox;
use crate::node::{LocalCoordinates, NodeIndex};
use crate::traits::{OrthPoint, OrthtreeTraits};
use crate::tree::Orthtree;

/// Collaborator storing a point set.
#[derive(Clone, Debug)]
pub struct PointSetTraits<P, const D: usize> {
  points: Vec<P>,
  bbox: Bbox<D>,
}

impl<P: OrthPoint<D>, const D: usize> PointSetTraits<P, D> {
  /// Wrap `points`; the root box is the smallest cube enclosing them.
  ///
  /// An empty set gets a degenerate box at the origin.
  pub fn new(points: Vec<P>) -> Self {
    let coordinates: Vec<[f64; D]> = points.iter().map(|p| p.coordinates()).collect();
    let bbox = Bbox::enclosing(&coordinates)
      .map(|b| b.to_cube())
      .unwrap_or(Bbox {
        min: [0.0; D],
        max: [0.0; D],
      });
    Self { points, bbox }
  }

  /// Wrap `points` with an explicit root box.
  ///
  /// Debug-asserts that every point lies inside `bbox`.
  pub fn with_bbox(points: Vec<P>, bbox: Bbox<D>) -> Self {
    debug_assert!(
      points.iter().all(|p| bbox.contains_point(&p.coordinates())),
      "PointSetTraits: point outside the root box"
    );
    Self { points, bbox }
  }

  #[inline]
  pub fn points(&self) -> &[P] {
    &self.points
  }

  #[inline]
  pub fn point(&self, index: usize) -> &P {
    &self.points[index]
  }

  /// Child slot of `point` relative to `center`.
  fn slot(&self, center: &[f64; D], point: &[f64; D]) -> usize {
    (0..D)
      .fold(LocalCoordinates::default(), |local, axis| {
        local.with_axis(axis, self.locate_halfspace(center[axis], point[axis]))
      })
      .index()
  }
}

impl<P: OrthPoint<D>, const D: usize> OrthtreeTraits<D> for PointSetTraits<P, D> {
  type Point = P;
  type NodeData = Vec<usize>;

  fn construct_root_bbox(&self) -> Bbox<D> {
    self.bbox
  }

  fn construct_root_contents(&self) -> Vec<usize> {
    (0..self.points.len()).collect()
  }

  fn distribute_node_contents(tree: &mut Orthtree<Self, D>, node: NodeIndex, center: &P) {
    let center = center.coordinates();
    let mut buckets: SmallVec<[Vec<usize>; 8]> =
      (0..Orthtree::<Self, D>::DEGREE).map(|_| Vec::new()).collect();

    let traits = tree.traits();
    for &i in tree.data(node) {
      let slot = traits.slot(&center, &traits.points[i].coordinates());
      buckets[slot].push(i);
    }

    for (slot, bucket) in buckets.into_iter().enumerate() {
      let child = tree.child(node, slot);
      *tree.data_mut(child) = bucket;
    }
  }
}

/// Point quadtree over `glam::DVec2`.
pub type Quadtree = Orthtree<PointSetTraits<DVec2, 2>, 2>;

/// Point octree over `glam::DVec3`.
pub type Octree = Orthtree<PointSetTraits<DVec3, 3>, 3>;

/// Candidate for k-nearest search.
/// Max-heap ordering (largest distance on top) for pruning.
#[derive(Clone, Copy, Debug)]
struct NearestCandidate {
  index: usize,
  distance_squared: f64,
}

impl PartialEq for NearestCandidate {
  fn eq(&self, other: &Self) -> bool {
    self.distance_squared == other.distance_squared
  }
}

impl Eq for NearestCandidate {}

impl PartialOrd for NearestCandidate {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for NearestCandidate {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .distance_squared
      .partial_cmp(&other.distance_squared)
      .unwrap_or(Ordering::Equal)
  }
}

fn squared_distance<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
  a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl<P: OrthPoint<D>, const D: usize> Orthtree<PointSetTraits<P, D>, D> {
  /// Single-node tree over `points`, root box = enclosing cube.
  pub fn from_points(points: Vec<P>) -> Self {
    Self::new(PointSetTraits::new(points))
  }

  /// Single-node tree over `points` with an explicit root box.
  pub fn from_points_in(points: Vec<P>, bbox: Bbox<D>) -> Self {
    Self::new(PointSetTraits::with_bbox(points, bbox))
  }

  /// Points stored in `node` (all points of its subtree).
  pub fn points_in(&self, node: NodeIndex) -> impl Iterator<Item = &P> + '_ {
    let traits = self.traits();
    self.data(node).iter().map(move |&i| traits.point(i))
  }

  /// Indices of the `k` points closest to `query`, nearest first.
  ///
  /// Leaves are visited nearest-box-first and whole subtrees are skipped once
  /// they are farther than the current k-th candidate.
  pub fn nearest_neighbors(&self, query: &P, k: usize) -> Vec<usize> {
    if k == 0 {
      return Vec::new();
    }
    let q = query.coordinates();
    let mut heap: BinaryHeap<NearestCandidate> = BinaryHeap::with_capacity(k + 1);
    let mut stack: SmallVec<[NodeIndex; 32]> = SmallVec::new();
    stack.push(self.root());

    while let Some(node) = stack.pop() {
      if heap.len() == k {
        let worst = heap.peek().map_or(f64::INFINITY, |c| c.distance_squared);
        if self.bbox(node).squared_distance(&q) > worst {
          continue;
        }
      }

      match self.children(node) {
        Some(children) => {
          let mut ordered: SmallVec<[(f64, NodeIndex); 8]> = children
            .map(|c| (self.bbox(c).squared_distance(&q), c))
            .collect();
          // Farthest pushed first so the nearest is popped next.
          ordered.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
          stack.extend(ordered.into_iter().map(|(_, c)| c));
        }
        None => {
          for &i in self.data(node) {
            let distance_squared = squared_distance(&q, &self.traits().point(i).coordinates());
            if heap.len() < k {
              heap.push(NearestCandidate {
                index: i,
                distance_squared,
              });
            } else if heap.peek().is_some_and(|worst| distance_squared < worst.distance_squared) {
              heap.pop();
              heap.push(NearestCandidate {
                index: i,
                distance_squared,
              });
            }
          }
        }
      }
    }

    heap.into_sorted_vec().into_iter().map(|c| c.index).collect()
  }
}

#[cfg(test)]
#[path = "point_set_test.rs"]
mod point_set_test;
