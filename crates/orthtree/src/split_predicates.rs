//! Ready-made split predicates for `Orthtree::refine`.
//!
//! Each constructor returns a closure `(node, tree) -> bool` that answers
//! "should this leaf be split?".

use crate::config::RefineConfig;
use crate::node::NodeIndex;
use crate::traits::{ContainedElements, OrthtreeTraits};
use crate::tree::Orthtree;

/// Split every leaf shallower than `max_depth`.
///
/// Produces a complete tree of depth `max_depth`.
pub fn maximum_depth<T, const D: usize>(
  max_depth: usize,
) -> impl Fn(NodeIndex, &Orthtree<T, D>) -> bool
where
  T: OrthtreeTraits<D>,
{
  move |n, tree| (tree.depth(n) as usize) < max_depth
}

/// Split every leaf holding more than `bucket_size` elements.
///
/// Unbounded in depth: coincident elements beyond the bucket size keep
/// splitting until `MAX_DEPTH`, where `refine` stops offering leaves.
pub fn maximum_contained_elements<T, const D: usize>(
  bucket_size: usize,
) -> impl Fn(NodeIndex, &Orthtree<T, D>) -> bool
where
  T: OrthtreeTraits<D>,
  T::NodeData: ContainedElements,
{
  move |n, tree| tree.data(n).contained_elements() > bucket_size
}

/// Split leaves shallower than `max_depth` holding more than `bucket_size`
/// elements.
pub fn maximum_depth_and_maximum_contained_elements<T, const D: usize>(
  max_depth: usize,
  bucket_size: usize,
) -> impl Fn(NodeIndex, &Orthtree<T, D>) -> bool
where
  T: OrthtreeTraits<D>,
  T::NodeData: ContainedElements,
{
  let config = RefineConfig::new(max_depth, bucket_size);
  move |n, tree| config.should_split(tree.depth(n) as usize, tree.data(n).contained_elements())
}
