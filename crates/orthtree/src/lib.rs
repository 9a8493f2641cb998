//! orthtree - N-dimensional quadtree/octree generalization
//!
//! An orthtree recursively partitions an axis-aligned box into `2^D`
//! congruent children: a binary tree in 1D, a quadtree in 2D, an octree in
//! 3D, and so on. Nodes live in an append-only arena and refer to each other
//! by index, so node handles are plain `usize`s that never dangle.
//!
//! # Features
//!
//! - **Refinement**: breadth-first splitting driven by any predicate, with
//!   ready-made depth/bucket-size predicates
//! - **Grading**: 2:1 balance between face-adjacent leaves
//! - **Traversal**: lazy preorder, postorder, leaves-only and fixed-depth
//!   orders without recursion
//! - **Neighbors**: face-adjacent node lookup across subtrees of different
//!   depth
//! - **Queries**: point location and box/sphere intersection
//! - **Named properties**: typed per-node side tables that grow with the tree
//!
//! Geometry decisions are delegated to an [`OrthtreeTraits`] collaborator.
//! Two are bundled: [`RegionTraits`] (no payload) and [`PointSetTraits`]
//! (point cloud, the classic point quadtree/octree).
//!
//! # Example
//!
//! ```ignore
//! use glam::DVec2;
//! use orthtree::{Quadtree, Leaves};
//!
//! let points = vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0), DVec2::new(0.9, 0.2)];
//! let mut tree = Quadtree::from_points(points);
//! tree.refine_to(4, 1);
//! tree.grade();
//!
//! for leaf in tree.traverse(Leaves) {
//!   println!("{:?} holds {} points", tree.bbox(leaf), tree.data(leaf).len());
//! }
//! ```

pub mod adjacency;
pub mod arena;
pub mod bbox;
pub mod config;
pub mod node;
pub mod point_set;
pub mod properties;
pub mod region;
pub mod split_predicates;
pub mod stats;
pub mod traits;
pub mod traversal;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports
pub use arena::NodeArena;
pub use bbox::{Bbox, Intersects, Sphere};
pub use config::RefineConfig;
pub use node::{
  degree, Adjacency, Direction, GlobalCoordinates, LocalCoordinates, NodeIndex, MAX_DIMENSION,
};
pub use point_set::{Octree, PointSetTraits, Quadtree};
pub use properties::{PropertyArray, PropertyError};
pub use region::{RegionTraits, RegionTree};
pub use stats::{RefinementStats, TreeStats};
pub use traits::{ContainedElements, OrthPoint, OrthtreeTraits};
pub use traversal::{Leaves, Level, Postorder, Preorder, Traversal, Traverse};
pub use tree::{Orthtree, MAX_DEPTH, ROOT};
