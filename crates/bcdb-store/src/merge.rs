//! The authoritative in-memory catalog with at-most-once insert.

use std::collections::HashSet;

use bcdb_core::{normalize, BrandRecord};

/// Ordered catalog keyed by normalized brand name.
///
/// Records are only ever appended. A record whose key is already present is
/// dropped, so existing entries (including hand-curated fields) are never
/// overwritten.
#[derive(Debug, Default)]
pub struct MergeStore {
    items: Vec<BrandRecord>,
    keys: HashSet<String>,
}

impl MergeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from previously persisted items.
    ///
    /// Duplicate keys in `items` collapse to their first occurrence.
    #[must_use]
    pub fn from_items(items: Vec<BrandRecord>) -> Self {
        let mut store = Self::new();
        let mut dropped = 0usize;
        for record in items {
            if !store.insert(record) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, "persisted catalog held duplicate brand keys; kept first");
        }
        store
    }

    /// Appends `record` unless its key is already present.
    ///
    /// Returns `true` when the record was added.
    pub fn insert(&mut self, record: BrandRecord) -> bool {
        let key = record.key();
        if key.is_empty() || !self.keys.insert(key) {
            return false;
        }
        self.items.push(record);
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&normalize(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[BrandRecord] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<BrandRecord> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_appends_new_record() {
        let mut store = MergeStore::new();
        assert!(store.insert(BrandRecord::named("Nestle")));
        assert_eq!(store.len(), 1);
        assert!(store.contains("NESTLE"));
    }

    #[test]
    fn insert_same_record_twice_is_idempotent() {
        let record = BrandRecord::named("Puma");
        let mut once = MergeStore::new();
        once.insert(record.clone());

        let mut twice = MergeStore::new();
        twice.insert(record.clone());
        assert!(!twice.insert(record));

        assert_eq!(once.items(), twice.items());
    }

    #[test]
    fn colliding_keys_keep_first_record() {
        let mut first = BrandRecord::named("Coca-Cola");
        first.description = "curated by hand".to_string();
        let mut second = BrandRecord::named("coca cola");
        second.description = "scraped later".to_string();

        let mut store = MergeStore::new();
        assert!(store.insert(first));
        assert!(!store.insert(second));

        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].name, "Coca-Cola");
        assert_eq!(store.items()[0].description, "curated by hand");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut store = MergeStore::new();
        for name in ["Zara", "Adidas", "Mars"] {
            store.insert(BrandRecord::named(name));
        }
        let names: Vec<&str> = store.items().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zara", "Adidas", "Mars"]);
    }

    #[test]
    fn record_with_empty_key_is_rejected() {
        let mut store = MergeStore::new();
        assert!(!store.insert(BrandRecord::named("  ")));
        assert!(store.is_empty());
    }

    #[test]
    fn from_items_collapses_duplicates() {
        let store = MergeStore::from_items(vec![
            BrandRecord::named("HP"),
            BrandRecord::named("Intel"),
            BrandRecord::named("hp"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.items()[0].name, "HP");
    }
}
