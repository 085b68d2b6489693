//! Append/prepend-only ordered container used to hold every loaded trip.

use std::collections::VecDeque;

use crate::error::OutOfRange;

/// A linear sequence that grows at both ends and is read by position.
///
/// Elements are never removed or mutated in place once inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedSequence<T> {
    items: VecDeque<T>,
}

impl<T> OrderedSequence<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Prepends `item`. Every existing element moves one position back.
    pub fn insert_front(&mut self, item: T) {
        self.items.push_front(item);
    }

    /// Appends `item` after the current last element.
    pub fn insert_back(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index` is not in `[0, len)`.
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        self.items.get(index).ok_or(OutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for OrderedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for OrderedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedSequence<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
