//! Geometry collaborator plugged into an `Orthtree`.
//!
//! The tree never interprets coordinates or payloads itself. Root region,
//! root payload, point construction, half-space decisions and the split-time
//! redistribution of payload all come from an `OrthtreeTraits` implementation.

use glam::{DVec2, DVec3};

use crate::bbox::Bbox;
use crate::node::NodeIndex;
use crate::tree::Orthtree;

/// A point with `D` double-precision coordinates.
pub trait OrthPoint<const D: usize>: Copy {
  /// Build a point from its Cartesian coordinates.
  fn from_coordinates(coordinates: [f64; D]) -> Self;

  /// Cartesian coordinates of the point.
  fn coordinates(&self) -> [f64; D];
}

impl<const D: usize> OrthPoint<D> for [f64; D] {
  #[inline]
  fn from_coordinates(coordinates: [f64; D]) -> Self {
    coordinates
  }

  #[inline]
  fn coordinates(&self) -> [f64; D] {
    *self
  }
}

impl OrthPoint<2> for DVec2 {
  #[inline]
  fn from_coordinates(coordinates: [f64; 2]) -> Self {
    DVec2::from_array(coordinates)
  }

  #[inline]
  fn coordinates(&self) -> [f64; 2] {
    self.to_array()
  }
}

impl OrthPoint<3> for DVec3 {
  #[inline]
  fn from_coordinates(coordinates: [f64; 3]) -> Self {
    DVec3::from_array(coordinates)
  }

  #[inline]
  fn coordinates(&self) -> [f64; 3] {
    self.to_array()
  }
}

/// Policy object supplying every geometry-specific decision of a tree.
///
/// # Contract
///
/// `distribute_node_contents` is called exactly once per `split`, after the
/// children exist. It must leave each child's payload consistent with the
/// parent's pre-split payload, typically by partitioning it with the same
/// half-space test `locate` uses.
pub trait OrthtreeTraits<const D: usize>: Sized {
  /// Point type used for barycenters and `locate` queries.
  type Point: OrthPoint<D>;

  /// Per-node payload. Fresh children start at `Default::default()`.
  type NodeData: Default;

  /// Region covered by the root node.
  fn construct_root_bbox(&self) -> Bbox<D>;

  /// Payload of the root node.
  fn construct_root_contents(&self) -> Self::NodeData;

  /// Push the payload of the freshly split `node` down to its children.
  ///
  /// `center` is the barycenter of `node`. The tree is handed over
  /// exclusively for the duration of the call.
  fn distribute_node_contents(tree: &mut Orthtree<Self, D>, node: NodeIndex, center: &Self::Point);

  /// Whether `coordinate` lies in the greater half relative to `center`
  /// along one axis.
  #[inline]
  fn locate_halfspace(&self, center: f64, coordinate: f64) -> bool {
    center < coordinate
  }

  /// Build a point from Cartesian coordinates.
  #[inline]
  fn construct_point(&self, coordinates: [f64; D]) -> Self::Point {
    Self::Point::from_coordinates(coordinates)
  }
}

/// Payloads that hold a countable number of elements.
///
/// Required by the bucket-size refinement predicates.
pub trait ContainedElements {
  fn contained_elements(&self) -> usize;
}

impl<T> ContainedElements for Vec<T> {
  #[inline]
  fn contained_elements(&self) -> usize {
    self.len()
  }
}

impl<T> ContainedElements for [T] {
  #[inline]
  fn contained_elements(&self) -> usize {
    self.len()
  }
}
