//! Named, typed per-node property arrays.
//!
//! Auxiliary data attached to tree nodes by name. Each property is a dense
//! array indexed by `NodeIndex` that grows together with the node arena; new
//! nodes receive the property's default value.

use std::any::Any;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use thiserror::Error;

use crate::node::NodeIndex;

/// Errors from named property lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
  /// A property with this name is already registered.
  #[error("node property already exists: {0}")]
  AlreadyExists(String),

  /// No property with this name is registered.
  #[error("node property not found: {0}")]
  NotFound(String),

  /// The property exists but stores a different value type.
  #[error("node property {name} does not hold values of type {requested}")]
  TypeMismatch {
    name: String,
    requested: &'static str,
  },
}

/// Dense per-node values of one property.
#[derive(Clone, Debug)]
pub struct PropertyArray<T> {
  values: Vec<T>,
  default: T,
}

impl<T: Clone> PropertyArray<T> {
  fn new(len: usize, default: T) -> Self {
    Self {
      values: vec![default.clone(); len],
      default,
    }
  }

  /// Value for `node`, or `None` if the index was never allocated.
  #[inline]
  pub fn get(&self, node: NodeIndex) -> Option<&T> {
    self.values.get(node)
  }

  /// Mutable value for `node`.
  #[inline]
  pub fn get_mut(&mut self, node: NodeIndex) -> Option<&mut T> {
    self.values.get_mut(node)
  }

  /// Number of nodes covered (always the arena size).
  #[inline]
  pub fn len(&self) -> usize {
    self.values.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Value newly allocated nodes receive.
  pub fn default_value(&self) -> &T {
    &self.default
  }

  /// Values in node index order.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.values.iter()
  }

  /// All values as a slice indexed by node.
  pub fn as_slice(&self) -> &[T] {
    &self.values
  }
}

impl<T> Index<NodeIndex> for PropertyArray<T> {
  type Output = T;

  #[inline]
  fn index(&self, node: NodeIndex) -> &T {
    &self.values[node]
  }
}

impl<T> IndexMut<NodeIndex> for PropertyArray<T> {
  #[inline]
  fn index_mut(&mut self, node: NodeIndex) -> &mut T {
    &mut self.values[node]
  }
}

/// Type-erased property array stored in the container.
trait ErasedArray: Send + Sync {
  fn grow(&mut self, additional: usize);
  fn len(&self) -> usize;
  fn clone_box(&self) -> Box<dyn ErasedArray>;
  fn as_any(&self) -> &dyn Any;
  fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Clone + Send + Sync + 'static> ErasedArray for PropertyArray<T> {
  fn grow(&mut self, additional: usize) {
    let len = self.values.len() + additional;
    self.values.resize(len, self.default.clone());
  }

  fn len(&self) -> usize {
    self.values.len()
  }

  fn clone_box(&self) -> Box<dyn ErasedArray> {
    Box::new(self.clone())
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}

/// Name → property array map, kept the same length as the node arena.
pub(crate) struct PropertyContainer {
  len: usize,
  arrays: HashMap<String, Box<dyn ErasedArray>>,
}

impl PropertyContainer {
  pub(crate) fn new() -> Self {
    Self {
      len: 0,
      arrays: HashMap::new(),
    }
  }

  /// Extend every array by `additional` default values.
  pub(crate) fn grow(&mut self, additional: usize) {
    self.len += additional;
    for array in self.arrays.values_mut() {
      array.grow(additional);
    }
    debug_assert!(self.arrays.values().all(|a| a.len() == self.len));
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.arrays.contains_key(name)
  }

  pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
    self.arrays.keys().map(String::as_str)
  }

  pub(crate) fn add<T>(&mut self, name: &str, default: T) -> Result<&mut PropertyArray<T>, PropertyError>
  where
    T: Clone + Send + Sync + 'static,
  {
    if self.arrays.contains_key(name) {
      return Err(PropertyError::AlreadyExists(name.to_owned()));
    }
    let array: Box<dyn ErasedArray> = Box::new(PropertyArray::new(self.len, default));
    let slot = self.arrays.entry(name.to_owned()).or_insert(array);
    downcast_mut(name, slot.as_mut())
  }

  pub(crate) fn get_or_add<T>(
    &mut self,
    name: &str,
    default: T,
  ) -> Result<(&mut PropertyArray<T>, bool), PropertyError>
  where
    T: Clone + Send + Sync + 'static,
  {
    let created = !self.arrays.contains_key(name);
    let len = self.len;
    let slot = self
      .arrays
      .entry(name.to_owned())
      .or_insert_with(|| -> Box<dyn ErasedArray> { Box::new(PropertyArray::new(len, default)) });
    Ok((downcast_mut(name, slot.as_mut())?, created))
  }

  pub(crate) fn get<T: 'static>(&self, name: &str) -> Result<&PropertyArray<T>, PropertyError> {
    let array = self
      .arrays
      .get(name)
      .ok_or_else(|| PropertyError::NotFound(name.to_owned()))?;
    array
      .as_any()
      .downcast_ref::<PropertyArray<T>>()
      .ok_or_else(|| mismatch::<T>(name))
  }

  pub(crate) fn get_mut<T: 'static>(&mut self, name: &str) -> Result<&mut PropertyArray<T>, PropertyError> {
    let array = self
      .arrays
      .get_mut(name)
      .ok_or_else(|| PropertyError::NotFound(name.to_owned()))?;
    downcast_mut(name, array.as_mut())
  }

  pub(crate) fn remove(&mut self, name: &str) -> bool {
    self.arrays.remove(name).is_some()
  }
}

impl Clone for PropertyContainer {
  fn clone(&self) -> Self {
    Self {
      len: self.len,
      arrays: self
        .arrays
        .iter()
        .map(|(name, array)| (name.clone(), array.clone_box()))
        .collect(),
    }
  }
}

impl std::fmt::Debug for PropertyContainer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PropertyContainer")
      .field("len", &self.len)
      .field("names", &self.arrays.keys().collect::<Vec<_>>())
      .finish()
  }
}

fn downcast_mut<'a, T: 'static>(
  name: &str,
  array: &'a mut dyn ErasedArray,
) -> Result<&'a mut PropertyArray<T>, PropertyError> {
  array
    .as_any_mut()
    .downcast_mut::<PropertyArray<T>>()
    .ok_or_else(|| mismatch::<T>(name))
}

fn mismatch<T>(name: &str) -> PropertyError {
  PropertyError::TypeMismatch {
    name: name.to_owned(),
    requested: std::any::type_name::<T>(),
  }
}

#[cfg(test)]
#[path = "properties_test.rs"]
mod properties_test;
