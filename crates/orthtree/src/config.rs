//! RefineConfig - limits for bucket-style refinement.

/// Limits used by `Orthtree::refine_with`.
///
/// A leaf is split while it is shallower than `max_depth` and holds more than
/// `bucket_size` elements. Refinement stops as soon as either condition fails:
/// an overfull leaf at `max_depth` stays a leaf, and so does a shallow leaf
/// that already fits in its bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefineConfig {
  /// Deepest level allowed (nodes at this depth are never split).
  pub max_depth: usize,
  /// Maximum number of elements a leaf may hold.
  pub bucket_size: usize,
}

impl RefineConfig {
  pub const fn new(max_depth: usize, bucket_size: usize) -> Self {
    Self {
      max_depth,
      bucket_size,
    }
  }

  /// Whether a node at `depth` holding `elements` should be split.
  #[inline]
  pub fn should_split(&self, depth: usize, elements: usize) -> bool {
    depth < self.max_depth && elements > self.bucket_size
  }
}

impl Default for RefineConfig {
  fn default() -> Self {
    Self {
      max_depth: 10,
      bucket_size: 20,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = RefineConfig::default();
    assert_eq!(config.max_depth, 10);
    assert_eq!(config.bucket_size, 20);
  }

  #[test]
  fn test_should_split_needs_both_conditions() {
    let config = RefineConfig::new(3, 2);
    assert!(config.should_split(0, 3));
    assert!(config.should_split(2, 100));
    assert!(!config.should_split(3, 100), "max depth reached");
    assert!(!config.should_split(0, 2), "bucket not overfull");
  }

  #[test]
  fn test_zero_bucket_splits_any_non_empty_node() {
    let config = RefineConfig::new(1, 0);
    assert!(config.should_split(0, 1));
    assert!(!config.should_split(0, 0));
  }
}
