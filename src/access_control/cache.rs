//! Board identifier cache
//!
//! Maps accepted board identifier forms (short link or canonical id) to the
//! canonical id. A given input string always resolves to the same board, so
//! entries are written once and never evicted or updated; the cache lives for
//! the process lifetime. It grows monotonically, which is intentional: the
//! set of board identifiers a deployment touches is small and stable, so the
//! unbounded map is not a leak in practice.
//!
//! The cache is behind a trait so tests can substitute a fake and assert
//! lookup counts.

use std::collections::HashMap;
use std::sync::RwLock;

/// Storage seam for resolved board identifiers.
pub trait BoardIdCache: Send + Sync {
    /// Look up a previously resolved input.
    fn get(&self, input: &str) -> Option<String>;

    /// Insert a resolution, keeping any value already present.
    ///
    /// Returns the winning value. Concurrent writers of the same key race
    /// benignly: both resolved the same board, so whichever insert lands
    /// first is as good as the other.
    fn insert_if_absent(&self, input: &str, canonical: &str) -> String;

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide in-memory cache.
#[derive(Debug, Default)]
pub struct InMemoryBoardIdCache {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryBoardIdCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardIdCache for InMemoryBoardIdCache {
    fn get(&self, input: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(input)
            .cloned()
    }

    fn insert_if_absent(&self, input: &str, canonical: &str) -> String {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries
            .entry(input.to_string())
            .or_insert_with(|| canonical.to_string())
            .clone()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_miss_then_hit() {
        let cache = InMemoryBoardIdCache::new();
        assert!(cache.get("short1").is_none());

        cache.insert_if_absent("short1", "B1");
        assert_eq!(cache.get("short1").as_deref(), Some("B1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_if_absent_keeps_first_value() {
        let cache = InMemoryBoardIdCache::new();
        assert_eq!(cache.insert_if_absent("short1", "B1"), "B1");
        // A second writer for the same key does not overwrite
        assert_eq!(cache.insert_if_absent("short1", "B1"), "B1");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_inputs_are_distinct_entries() {
        let cache = InMemoryBoardIdCache::new();
        // Short link and canonical id of the same board are separate keys
        cache.insert_if_absent("short1", "B1");
        cache.insert_if_absent("B1", "B1");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("short1").as_deref(), Some("B1"));
        assert_eq!(cache.get("B1").as_deref(), Some("B1"));
    }
}
