//! Bidirectional cursor over an [`OrderedSequence`].

use std::fmt;

use crate::sequence::OrderedSequence;

/// A stateful cursor that owns a sequence and walks it in either direction.
///
/// The cursor starts before the first element. `next` moves it forward and
/// returns the element it lands on; `previous` moves it back, but never
/// past the first element.
#[derive(Debug, Clone)]
pub struct CursorIterator<T> {
    sequence: OrderedSequence<T>,
    // None is the before-start position
    position: Option<usize>,
}

impl<T> CursorIterator<T> {
    pub fn new() -> Self {
        Self::from(OrderedSequence::new())
    }

    pub fn has_next(&self) -> bool {
        match self.position {
            None => !self.sequence.is_empty(),
            Some(pos) => pos + 1 < self.sequence.len(),
        }
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.position, Some(pos) if pos > 0)
    }

    /// Advances the cursor and returns the element it now points at.
    ///
    /// Returns `None` and leaves the cursor alone when there is no next element.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        if !self.has_next() {
            return None;
        }
        let pos = self.position.map_or(0, |p| p + 1);
        self.position = Some(pos);
        self.sequence.at(pos).ok()
    }

    /// Moves the cursor back one element and returns it.
    pub fn previous(&mut self) -> Option<&T> {
        if !self.has_previous() {
            return None;
        }
        let pos = self.position.map_or(0, |p| p - 1);
        self.position = Some(pos);
        self.sequence.at(pos).ok()
    }

    /// Puts the cursor back before the first element.
    pub fn reset(&mut self) {
        self.position = None;
    }

    /// Index of the element last returned, or `None` before the first `next`.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Appends to the underlying sequence without moving the cursor.
    pub fn append(&mut self, item: T) {
        self.sequence.insert_back(item);
    }

    /// Prepends to the underlying sequence without moving the cursor.
    ///
    /// The cursor index is kept, so it now refers to the element that was
    /// one position earlier.
    pub fn prepend(&mut self, item: T) {
        self.sequence.insert_front(item);
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn sequence(&self) -> &OrderedSequence<T> {
        &self.sequence
    }

    pub fn into_inner(self) -> OrderedSequence<T> {
        self.sequence
    }
}

impl<T: fmt::Display> CursorIterator<T> {
    /// Renders every element as `"[<len>]: e1-e2-...-en"`, ignoring the cursor.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl<T> Default for CursorIterator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<OrderedSequence<T>> for CursorIterator<T> {
    fn from(sequence: OrderedSequence<T>) -> Self {
        Self {
            sequence,
            position: None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for CursorIterator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: ", self.sequence.len())?;
        for (i, item) in self.sequence.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_of(values: &[i32]) -> CursorIterator<i32> {
        CursorIterator::from(values.iter().copied().collect::<OrderedSequence<_>>())
    }

    fn drain_forward(cursor: &mut CursorIterator<i32>) -> Vec<i32> {
        let mut seen = Vec::new();
        while cursor.has_next() {
            seen.push(*cursor.next().unwrap());
        }
        seen
    }

    #[test]
    fn test_empty_cursor_has_nothing() {
        let mut cursor: CursorIterator<i32> = CursorIterator::new();
        assert!(!cursor.has_next());
        assert!(!cursor.has_previous());
        assert!(cursor.next().is_none());
        assert!(cursor.previous().is_none());
        assert_eq!(cursor.position(), None);
    }

    #[test]
    fn test_has_next_after_insertion() {
        let mut cursor = CursorIterator::new();
        assert!(!cursor.has_next());
        cursor.append(1);
        assert!(cursor.has_next());
    }

    #[test]
    fn test_forward_traversal_visits_each_once() {
        let mut cursor = cursor_of(&[10, 20, 30, 40]);
        assert_eq!(drain_forward(&mut cursor), vec![10, 20, 30, 40]);
        assert!(!cursor.has_next());
        assert!(cursor.next().is_none());
        assert_eq!(cursor.position(), Some(3));
    }

    #[test]
    fn test_previous_retraces_in_reverse() {
        let mut cursor = cursor_of(&[1, 2, 3, 4]);
        drain_forward(&mut cursor);

        let mut back = Vec::new();
        while cursor.has_previous() {
            back.push(*cursor.previous().unwrap());
        }
        // the last element returned by next is the starting point
        assert_eq!(back, vec![3, 2, 1]);
        assert!(cursor.previous().is_none());
        assert_eq!(cursor.position(), Some(0));
    }

    #[test]
    fn test_reset_replays_same_traversal() {
        let mut cursor = cursor_of(&[5, 6, 7]);
        let first = drain_forward(&mut cursor);

        cursor.reset();
        cursor.next();
        cursor.next();
        cursor.previous();
        cursor.reset();

        assert_eq!(cursor.position(), None);
        assert_eq!(drain_forward(&mut cursor), first);
    }

    #[test]
    fn test_append_and_prepend_keep_cursor_index() {
        let mut cursor = cursor_of(&[2, 3]);
        assert_eq!(cursor.next(), Some(&2));

        cursor.prepend(1);
        assert_eq!(cursor.position(), Some(0));
        assert_eq!(cursor.next(), Some(&2));

        cursor.append(4);
        assert_eq!(drain_forward(&mut cursor), vec![3, 4]);
        assert_eq!(cursor.len(), 4);
    }

    #[test]
    fn test_describe_lists_all_elements() {
        let mut cursor = cursor_of(&[1, 2, 3]);
        cursor.next();
        assert_eq!(cursor.describe(), "[3]: 1-2-3");

        let empty: CursorIterator<i32> = CursorIterator::default();
        assert_eq!(empty.describe(), "[0]: ");
    }

    #[test]
    fn test_into_inner_returns_sequence() {
        let mut cursor = cursor_of(&[1]);
        cursor.next();
        let seq = cursor.into_inner();
        assert_eq!(seq.len(), 1);
        assert_eq!(*seq.at(0).unwrap(), 1);
    }
}
