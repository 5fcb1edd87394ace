use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// Where the relay remembers LINE users who have talked to the bot.
pub trait RecipientStore: Send + Sync {
    /// Remember a user id. Returns `true` if it was not known yet.
    fn add(&self, user_id: &str) -> bool;

    /// Snapshot of every known user id, sorted.
    fn all(&self) -> Vec<String>;

    fn count(&self) -> usize;
}

/// Process-lifetime set of user ids. Starts empty and is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryRecipientStore {
    ids: RwLock<HashSet<String>>,
}

impl MemoryRecipientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// A writer panicking mid-insert cannot leave the set half-updated, so a
// poisoned lock is still safe to use.
impl RecipientStore for MemoryRecipientStore {
    fn add(&self, user_id: &str) -> bool {
        let mut ids = self.ids.write().unwrap_or_else(PoisonError::into_inner);
        if ids.contains(user_id) {
            return false;
        }
        ids.insert(user_id.to_string())
    }

    fn all(&self) -> Vec<String> {
        let ids = self.ids.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<String> = ids.iter().cloned().collect();
        all.sort();
        all
    }

    fn count(&self) -> usize {
        self.ids.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let store = MemoryRecipientStore::new();
        assert!(store.add("U1"));
        assert!(!store.add("U1"));
        assert_eq!(store.count(), 1);
        assert_eq!(store.all(), vec!["U1".to_string()]);
    }

    #[test]
    fn starts_empty() {
        let store = MemoryRecipientStore::new();
        assert_eq!(store.count(), 0);
        assert!(store.all().is_empty());
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let store = MemoryRecipientStore::new();

        std::thread::scope(|s| {
            for t in 0..8 {
                let store = &store;
                s.spawn(move || {
                    // Threads overlap on half of their ids
                    for i in 0..100 {
                        store.add(&format!("U{}", (t % 2) * 1000 + i));
                    }
                });
            }
        });

        assert_eq!(store.count(), 200);
    }
}
