use std::sync::Arc;

use parking_lot::Mutex;

use super::DocumentStore;
use crate::document::Document;

/// Cloneable, thread-safe access to one [`DocumentStore`].
///
/// All mutations go through a single lock, so there is exactly one writer
/// at a time. Readers that only need to look at the document should take a
/// [`snapshot`](Self::snapshot): it is immutable, cheap, and stays valid
/// while the store keeps changing.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<DocumentStore>>,
}

impl StoreHandle {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// The document as of now
    pub fn snapshot(&self) -> Document {
        self.inner.lock().snapshot()
    }

    /// Run a read-only closure against the store
    pub fn read<R>(&self, f: impl FnOnce(&DocumentStore) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run a mutating closure against the store
    pub fn dispatch<R>(&self, f: impl FnOnce(&mut DocumentStore) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<DocumentStore> for StoreHandle {
    fn from(store: DocumentStore) -> Self {
        Self::new(store)
    }
}
