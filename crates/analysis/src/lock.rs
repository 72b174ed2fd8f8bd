//! In-process advisory lock allowing one analysis run per document

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct DocumentLocks {
    held: Arc<Mutex<HashSet<Uuid>>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the document as busy, or None when a run already holds it
    pub fn try_acquire(&self, document_id: Uuid) -> Option<DocumentGuard> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if held.insert(document_id) {
            Some(DocumentGuard {
                locks: self.clone(),
                document_id,
            })
        } else {
            None
        }
    }

    pub fn is_held(&self, document_id: Uuid) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&document_id)
    }

    /// Number of documents currently held
    pub fn held_count(&self) -> usize {
        self.held.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Releases the document when dropped
#[derive(Debug)]
pub struct DocumentGuard {
    locks: DocumentLocks,
    document_id: Uuid,
}

impl Drop for DocumentGuard {
    fn drop(&mut self) {
        self.locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.document_id);
    }
}
