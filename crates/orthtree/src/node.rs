//! Node identity and coordinate types.
//!
//! Nodes live in an append-only arena and are named by their index; the root
//! is always index 0. Grid coordinates are expressed at the node's own depth,
//! not at the finest depth, so parent/child math is a shift and a bit:
//!
//! ```text
//! child[k] = parent[k] * 2 + bit_k(local)
//! parent[k] = child[k] / 2
//! ```

/// Index of a node in the tree arena. The root is always 0.
pub type NodeIndex = usize;

/// Per-axis integer position of a node within the grid of its depth.
pub type GlobalCoordinates<const D: usize> = [u32; D];

/// Largest supported dimension.
///
/// Children are addressed by a `D`-bit local coordinate and directions pack
/// the axis into the upper bits of a `u8`.
pub const MAX_DIMENSION: usize = 8;

/// Number of children of an internal node in `dimension` dimensions (2^D).
#[inline]
pub const fn degree(dimension: usize) -> usize {
  1 << dimension
}

/// Position of a node relative to the center of its parent.
///
/// Bit `k` is set when the node lies in the greater half along axis `k`:
/// - bit 0: X
/// - bit 1: Y
/// - bit 2: Z
///
/// The value doubles as the child slot, `child(parent, local.index())`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct LocalCoordinates(u32);

impl LocalCoordinates {
  /// Wrap a raw bit pattern.
  #[inline]
  pub const fn new(bits: u32) -> Self {
    Self(bits)
  }

  /// Derive the local coordinates from a node's global coordinates.
  pub fn from_global<const D: usize>(coordinates: &GlobalCoordinates<D>) -> Self {
    let bits = coordinates
      .iter()
      .enumerate()
      .fold(0u32, |acc, (axis, c)| acc | ((c & 1) << axis));
    Self(bits)
  }

  /// Raw bit pattern.
  #[inline]
  pub const fn bits(self) -> u32 {
    self.0
  }

  /// Child slot in `[0, 2^D)`.
  #[inline]
  pub const fn index(self) -> usize {
    self.0 as usize
  }

  /// Whether this node is on the greater side of its parent along `axis`.
  #[inline]
  pub const fn is_greater(self, axis: usize) -> bool {
    (self.0 >> axis) & 1 == 1
  }

  /// Set or clear the bit for `axis`.
  #[inline]
  pub const fn with_axis(self, axis: usize, greater: bool) -> Self {
    if greater {
      Self(self.0 | (1 << axis))
    } else {
      Self(self.0 & !(1 << axis))
    }
  }
}

impl From<usize> for LocalCoordinates {
  fn from(index: usize) -> Self {
    Self(index as u32)
  }
}

/// Global coordinates of the child in slot `local` of a node at `parent`.
pub fn child_coordinates<const D: usize>(
  parent: &GlobalCoordinates<D>,
  local: LocalCoordinates,
) -> GlobalCoordinates<D> {
  let mut out = [0u32; D];
  for (axis, c) in out.iter_mut().enumerate() {
    *c = parent[axis] * 2 + u32::from(local.is_greater(axis));
  }
  out
}

/// Global coordinates of the parent of a node at `child`.
pub fn parent_coordinates<const D: usize>(child: &GlobalCoordinates<D>) -> GlobalCoordinates<D> {
  child.map(|c| c / 2)
}

/// A face direction.
///
/// Bit 0 is the sign (set = positive), the remaining bits the axis:
///
/// ```text
/// 0b000 -X   0b001 +X
/// 0b010 -Y   0b011 +Y
/// 0b100 -Z   0b101 +Z
/// ```
///
/// A `D`-dimensional tree has `2 * D` directions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Direction(u8);

impl Direction {
  /// Direction along `axis`, toward the greater side when `positive`.
  #[inline]
  pub const fn new(axis: usize, positive: bool) -> Self {
    Self(((axis as u8) << 1) | positive as u8)
  }

  /// Wrap a raw encoded direction.
  #[inline]
  pub const fn from_bits(bits: u8) -> Self {
    Self(bits)
  }

  /// Raw encoded direction.
  #[inline]
  pub const fn bits(self) -> u8 {
    self.0
  }

  /// Axis this direction moves along.
  #[inline]
  pub const fn axis(self) -> usize {
    (self.0 >> 1) as usize
  }

  /// Whether this direction points toward the greater side of its axis.
  #[inline]
  pub const fn is_positive(self) -> bool {
    self.0 & 1 == 1
  }

  /// Same axis, other side.
  #[inline]
  pub const fn opposite(self) -> Self {
    Self(self.0 ^ 1)
  }

  /// All `2 * dimension` face directions in encoding order.
  pub fn all(dimension: usize) -> impl Iterator<Item = Direction> {
    (0..(2 * dimension) as u8).map(Direction)
  }
}

/// Named face directions for quadtrees and octrees.
///
/// Quadtrees use the first four.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Adjacency {
  /// -X
  Left = 0,
  /// +X
  Right = 1,
  /// -Y
  Down = 2,
  /// +Y
  Up = 3,
  /// -Z
  Back = 4,
  /// +Z
  Front = 5,
}

impl From<Adjacency> for Direction {
  fn from(adjacency: Adjacency) -> Self {
    Direction(adjacency as u8)
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
