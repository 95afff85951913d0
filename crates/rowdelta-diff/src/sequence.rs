use std::collections::VecDeque;

/// An ordered collection that a patch can be applied to.
///
/// Implementations must behave like `Vec`: `insert_at` shifts later elements
/// right, `remove_at` shifts them left. The patch applier validates a whole
/// script against `len()` before it calls either, so `insert_at` may assume
/// `index <= len()`.
pub trait MutableSequence<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Insert `element` at `index`.
    fn insert_at(&mut self, index: usize, element: T);

    /// Remove and return the element at `index`, or `None` when out of range.
    fn remove_at(&mut self, index: usize) -> Option<T>;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> MutableSequence<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn insert_at(&mut self, index: usize, element: T) {
        self.insert(index, element);
    }

    fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.len()).then(|| self.remove(index))
    }
}

impl<T> MutableSequence<T> for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn insert_at(&mut self, index: usize, element: T) {
        self.insert(index, element);
    }

    fn remove_at(&mut self, index: usize) -> Option<T> {
        self.remove(index)
    }
}
