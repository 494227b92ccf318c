/// Undo/redo stacks holding serialized document snapshots, owned by one
/// editor instance. Capturing actions push a pre-mutation snapshot; undo and
/// redo swap snapshots between the two stacks. Snapshot-and-restore is
/// O(document size) per action, an accepted cost for documents this size.
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<String>,
    redo: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation state. Any redo branch is discarded.
    pub fn record(&mut self, snapshot: String) {
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Pops the most recent snapshot, remembering `current` for redo.
    pub fn undo(&mut self, current: String) -> Option<String> {
        let snapshot = self.undo.pop()?;
        self.redo.push(current);
        Some(snapshot)
    }

    pub fn redo(&mut self, current: String) -> Option<String> {
        let snapshot = self.redo.pop()?;
        self.undo.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_returns_snapshots_in_reverse_order() {
        let mut history = History::new();
        history.record("one".to_string());
        history.record("two".to_string());

        assert_eq!(history.undo("three".to_string()), Some("two".to_string()));
        assert_eq!(history.undo("two".to_string()), Some("one".to_string()));
        assert_eq!(history.undo("one".to_string()), None);
    }

    #[test]
    fn redo_mirrors_undo() {
        let mut history = History::new();
        history.record("one".to_string());

        assert!(history.can_undo());
        assert!(!history.can_redo());

        let restored = history.undo("two".to_string());
        assert_eq!(restored, Some("one".to_string()));
        assert!(history.can_redo());

        assert_eq!(history.redo("one".to_string()), Some("two".to_string()));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn recording_clears_the_redo_branch() {
        let mut history = History::new();
        history.record("one".to_string());
        let _ = history.undo("two".to_string());
        assert!(history.can_redo());

        history.record("one-edited".to_string());
        assert!(!history.can_redo());
    }
}
