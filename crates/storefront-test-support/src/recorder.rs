//! Single-threaded recorder for values handed to callbacks.

use std::cell::RefCell;
use std::rc::Rc;

/// Clonable handle to a shared list of recorded values.
///
/// Clones observe the same list, so one handle can move into a callback while the test keeps
/// another.
#[derive(Debug)]
pub struct Recorder<T> {
    entries: Rc<RefCell<Vec<T>>>,
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<T> Recorder<T> {
    /// Record `value`.
    pub fn push(&self, value: T) {
        self.entries.borrow_mut().push(value);
    }

    /// Number of recorded values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Remove and return everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

impl<T: Clone> Recorder<T> {
    /// Most recent value.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.entries.borrow().last().cloned()
    }

    /// Copy of every recorded value.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let recorder = Recorder::default();
        let handle = recorder.clone();
        handle.push(1);
        handle.push(2);
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.last(), Some(2));
        assert_eq!(recorder.take(), vec![1, 2]);
        assert!(handle.is_empty());
    }
}
