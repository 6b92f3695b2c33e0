use crate::document::Document;

/// Linear undo/redo history of document snapshots.
///
/// `snapshots[index]` is the state the live document was last committed
/// to. Snapshots share unchanged sites, pages and blocks with each other,
/// so each entry costs roughly the size of the edit that produced it.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Document>,
    index: usize,
    /// Maximum number of snapshots kept (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Creates a history whose only entry is `initial`
    pub fn new(initial: Document, max_levels: usize) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            max_levels,
        }
    }

    /// Record a new snapshot after the cursor, discarding any redo future
    pub fn record(&mut self, snapshot: Document) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.snapshots.len() > self.max_levels {
            let excess = self.snapshots.len() - self.max_levels;
            self.snapshots.drain(..excess);
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Overwrite the snapshot under the cursor without touching the rest
    pub fn replace_current(&mut self, snapshot: Document) {
        self.snapshots[self.index] = snapshot;
    }

    /// Step back one snapshot. Returns `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Document> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    /// Step forward one snapshot. Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Document> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    /// Drop everything and start over from `initial`
    pub fn reset(&mut self, initial: Document) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.index = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn current(&self) -> &Document {
        &self.snapshots[self.index]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renamed(doc: &Document, name: &str) -> Document {
        let mut next = doc.clone();
        let key = next.active_page_key();
        next.page_mut(&key).unwrap().name = name.to_string();
        next
    }

    #[test]
    fn history_creation() {
        let history = History::new(Document::default(), 100);
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_redo_walks_the_cursor() {
        let d0 = Document::default();
        let d1 = renamed(&d0, "One");
        let mut history = History::new(d0.clone(), 100);
        history.record(d1.clone());

        assert_eq!(history.undo(), Some(&d0));
        assert!(history.undo().is_none());
        assert_eq!(history.redo(), Some(&d1));
        assert!(history.redo().is_none());
    }

    #[test]
    fn record_discards_redo_future() {
        let d0 = Document::default();
        let mut history = History::new(d0.clone(), 100);
        history.record(renamed(&d0, "One"));
        history.record(renamed(&d0, "Two"));
        history.undo();
        history.undo();

        history.record(renamed(&d0, "Three"));

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current().active_page().name, "Three");
    }

    #[test]
    fn max_levels_enforced() {
        let d0 = Document::default();
        let mut history = History::new(d0.clone(), 3);
        for i in 0..5 {
            history.record(renamed(&d0, &format!("Page {}", i)));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().active_page().name, "Page 4");
        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(history.current().active_page().name, "Page 2");
    }
}
