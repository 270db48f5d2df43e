//! Memento history for the store.

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// A bounded stack of saved states.
#[derive(Debug, Clone)]
pub struct History<T> {
    mementos: Vec<T>,
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_limit(MAX_UNDO_HISTORY)
    }
}

impl<T> History<T> {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            mementos: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Save a state (call before making changes). The oldest state is
    /// dropped once the limit is reached.
    pub fn save(&mut self, state: T) {
        self.mementos.push(state);
        if self.mementos.len() > self.limit {
            self.mementos.remove(0);
        }
    }

    /// Take the most recent saved state.
    pub fn undo(&mut self) -> Option<T> {
        self.mementos.pop()
    }

    pub fn len(&self) -> usize {
        self.mementos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_order() {
        let mut history = History::default();
        history.save(1);
        history.save(2);
        assert_eq!(history.undo(), Some(2));
        assert_eq!(history.undo(), Some(1));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(2);
        history.save("a");
        history.save("b");
        history.save("c");
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some("c"));
        assert_eq!(history.undo(), Some("b"));
        assert!(history.is_empty());
    }
}
