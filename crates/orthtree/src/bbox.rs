//! Axis-aligned boxes and query shapes in `D` dimensions.

/// Double-precision axis-aligned box.
///
/// Used both as the root region of a tree and as the region of each node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bbox<const D: usize> {
  /// Minimum corner (inclusive).
  pub min: [f64; D],
  /// Maximum corner (inclusive).
  pub max: [f64; D],
}

impl<const D: usize> Bbox<D> {
  /// Create a new box from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: [f64; D], max: [f64; D]) -> Self {
    debug_assert!(
      min.iter().zip(&max).all(|(lo, hi)| lo <= hi),
      "Bbox min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create a new box from center and half-extents.
  pub fn from_center_half_extents(center: [f64; D], half_extents: [f64; D]) -> Self {
    Self {
      min: std::array::from_fn(|i| center[i] - half_extents[i]),
      max: std::array::from_fn(|i| center[i] + half_extents[i]),
    }
  }

  /// Smallest box enclosing all `points`, or `None` when there are none.
  pub fn enclosing<'a, I>(points: I) -> Option<Self>
  where
    I: IntoIterator<Item = &'a [f64; D]>,
  {
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    let mut bbox = Self {
      min: first,
      max: first,
    };
    for p in iter {
      for axis in 0..D {
        bbox.min[axis] = bbox.min[axis].min(p[axis]);
        bbox.max[axis] = bbox.max[axis].max(p[axis]);
      }
    }
    Some(bbox)
  }

  /// Grow the shorter sides so every side matches the longest one, keeping
  /// the center fixed.
  pub fn to_cube(&self) -> Self {
    let size = self.size();
    let side = size.iter().copied().fold(0.0_f64, f64::max);
    let cube = Self::from_center_half_extents(self.center(), [side * 0.5; D]);
    // Rounding may shave an ulp off a side; never lose the original corners.
    Self {
      min: std::array::from_fn(|i| cube.min[i].min(self.min[i])),
      max: std::array::from_fn(|i| cube.max[i].max(self.max[i])),
    }
  }

  /// Check if this box overlaps with another.
  ///
  /// Two boxes overlap if they share any interior or boundary points.
  #[inline]
  pub fn overlaps(&self, other: &Bbox<D>) -> bool {
    (0..D).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
  }

  /// Check if this box contains a point.
  #[inline]
  pub fn contains_point(&self, point: &[f64; D]) -> bool {
    (0..D).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
  }

  /// Squared distance from `point` to the closest point of the box.
  pub fn squared_distance(&self, point: &[f64; D]) -> f64 {
    (0..D)
      .map(|i| {
        let d = if point[i] < self.min[i] {
          self.min[i] - point[i]
        } else if point[i] > self.max[i] {
          point[i] - self.max[i]
        } else {
          0.0
        };
        d * d
      })
      .sum()
  }

  /// Get the size of the box (max - min).
  #[inline]
  pub fn size(&self) -> [f64; D] {
    std::array::from_fn(|i| self.max[i] - self.min[i])
  }

  /// Get the center of the box.
  #[inline]
  pub fn center(&self) -> [f64; D] {
    std::array::from_fn(|i| (self.min[i] + self.max[i]) * 0.5)
  }
}

/// A solid ball, used as an `intersected_nodes` query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere<const D: usize> {
  pub center: [f64; D],
  pub radius: f64,
}

impl<const D: usize> Sphere<D> {
  pub fn new(center: [f64; D], radius: f64) -> Self {
    debug_assert!(radius >= 0.0, "Sphere radius must be non-negative");
    Self { center, radius }
  }
}

/// Query shapes usable with `Orthtree::intersected_nodes`.
pub trait Intersects<const D: usize> {
  /// Whether the shape touches `bbox` (boundary contact counts).
  fn intersects(&self, bbox: &Bbox<D>) -> bool;
}

impl<const D: usize> Intersects<D> for Bbox<D> {
  #[inline]
  fn intersects(&self, bbox: &Bbox<D>) -> bool {
    self.overlaps(bbox)
  }
}

impl<const D: usize> Intersects<D> for Sphere<D> {
  #[inline]
  fn intersects(&self, bbox: &Bbox<D>) -> bool {
    bbox.squared_distance(&self.center) <= self.radius * self.radius
  }
}

impl<const D: usize> Intersects<D> for [f64; D] {
  #[inline]
  fn intersects(&self, bbox: &Bbox<D>) -> bool {
    bbox.contains_point(self)
  }
}
