//! Value-equality wrapper over a shared, immutable slice.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, Index};
use std::sync::Arc;

use crate::error::{GeneratorError, Result};

/// An ordered, fixed-length sequence compared element by element.
///
/// Cloning shares the backing allocation. Two arrays are equal iff they have
/// the same length and pairwise-equal elements in order, which makes them
/// usable as incremental cache keys where `Vec` identity would not be.
pub struct StructuralArray<T> {
    items: Arc<[T]>,
}

impl<T> StructuralArray<T> {
    pub fn empty() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the only element, failing when the array is empty or ambiguous.
    pub fn single(&self) -> Result<&T> {
        match &*self.items {
            [item] => Ok(item),
            items => Err(GeneratorError::NotSingle { count: items.len() }),
        }
    }
}

impl<T> Clone for StructuralArray<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for StructuralArray<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: PartialEq> PartialEq for StructuralArray<T> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.items, &other.items) {
            return true;
        }
        if self.items.len() != other.items.len() {
            return false;
        }
        self.items.iter().zip(other.items.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for StructuralArray<T> {}

impl<T: Hash> Hash for StructuralArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.items.len());
        for item in self.items.iter() {
            item.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StructuralArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> Deref for StructuralArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> Index<usize> for StructuralArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> From<Vec<T>> for StructuralArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }
}

impl<T> From<Arc<[T]>> for StructuralArray<T> {
    fn from(items: Arc<[T]>) -> Self {
        Self { items }
    }
}

impl<T> From<StructuralArray<T>> for Arc<[T]> {
    fn from(array: StructuralArray<T>) -> Self {
        array.items
    }
}

impl<T> FromIterator<T> for StructuralArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a StructuralArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
