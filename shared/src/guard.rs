//! Per-entity in-flight guards
//!
//! Each async action (registration submit, wishlist add) is keyed by the id of
//! the entity it acts on. Actions on different ids run side by side; a second
//! action on an id that is still in flight is refused. The ticket releases the
//! id when dropped, so early returns and errors clear the flag too.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Set of entity ids with an outstanding action
#[derive(Debug, Clone, Default)]
pub struct ActionGuard {
    active: Arc<Mutex<HashSet<String>>>,
}

impl ActionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock leaves the set itself consistent
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark `id` as in flight; `None` if it already is
    pub fn try_acquire(&self, id: impl Into<String>) -> Option<ActionTicket> {
        let id = id.into();
        let mut active = self.lock();
        if !active.insert(id.clone()) {
            return None;
        }
        Some(ActionTicket {
            id,
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }
}

/// Proof that an action on one entity is in flight
#[derive(Debug)]
pub struct ActionTicket {
    id: String,
    active: Arc<Mutex<HashSet<String>>>,
}

impl ActionTicket {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for ActionTicket {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        active.remove(&self.id);
    }
}
