//! RegionTraits - a collaborator with no payload.
//!
//! Useful when the tree itself is the data: adaptive grids, LOD layouts, or
//! anything driven purely by `split`, `refine` and `grade`.

use crate::bbox::Bbox;
use crate::node::NodeIndex;
use crate::traits::OrthtreeTraits;
use crate::tree::Orthtree;

/// Pure spatial subdivision of a fixed box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionTraits<const D: usize> {
  bbox: Bbox<D>,
}

impl<const D: usize> RegionTraits<D> {
  pub fn new(bbox: Bbox<D>) -> Self {
    Self { bbox }
  }
}

impl<const D: usize> OrthtreeTraits<D> for RegionTraits<D> {
  type Point = [f64; D];
  type NodeData = ();

  fn construct_root_bbox(&self) -> Bbox<D> {
    self.bbox
  }

  fn construct_root_contents(&self) -> Self::NodeData {}

  fn distribute_node_contents(_tree: &mut Orthtree<Self, D>, _node: NodeIndex, _center: &[f64; D]) {}
}

/// Payload-free tree over a box.
pub type RegionTree<const D: usize> = Orthtree<RegionTraits<D>, D>;

impl<const D: usize> Orthtree<RegionTraits<D>, D> {
  /// Single-node tree covering `bbox`.
  pub fn from_bbox(bbox: Bbox<D>) -> Self {
    Self::new(RegionTraits::new(bbox))
  }
}
