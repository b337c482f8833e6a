//! Byte Store Module
//!
//! Bounded store combining HashMap storage with recency tracking and
//! byte-budget eviction. Not safe for concurrent use by itself; see
//! [`super::SyncCache`] for the locked wrapper.

use std::collections::HashMap;

use crate::cache::{RecencyList, SizedValue};

/// Hook invoked with each entry removed by eviction.
pub type EvictionHook<V> = Box<dyn FnMut(String, V) + Send>;

// == Byte Store ==
/// Recency-ordered key/value store bounded by a byte budget.
///
/// The tracked size is the sum of `key.len() + value.size()` over all
/// entries. Whenever `max_bytes > 0`, that sum never exceeds `max_bytes`
/// after a mutating operation returns. A budget of zero disables eviction
/// entirely.
pub struct ByteStore<V: SizedValue> {
    /// Key-value storage
    entries: HashMap<String, V>,
    /// Recency order, back = next eviction candidate
    recency: RecencyList,
    /// Byte budget; zero means unbounded
    max_bytes: u64,
    /// Bytes currently accounted for
    used_bytes: u64,
    /// Entries evicted over the store's lifetime
    evictions: u64,
    /// Optional callback fired with each evicted entry
    on_evict: Option<EvictionHook<V>>,
}

impl<V: SizedValue> ByteStore<V> {
    // == Constructor ==
    /// Creates a store with the given byte budget and optional eviction
    /// hook. A budget of zero means no eviction ever occurs.
    pub fn new(max_bytes: u64, on_evict: Option<EvictionHook<V>>) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyList::new(),
            max_bytes,
            used_bytes: 0,
            evictions: 0,
            on_evict,
        }
    }

    // == Get ==
    /// Looks up a key, marking it most recently used on a hit.
    ///
    /// A miss leaves the store untouched.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        if self.entries.contains_key(key) {
            self.recency.touch(key);
        }
        self.entries.get(key)
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts from the LRU end until the
    /// store fits its budget again.
    ///
    /// An entry whose own size already exceeds the budget is still
    /// inserted at the front and then immediately removed by the trailing
    /// eviction loop; it is never rejected up front.
    pub fn add(&mut self, key: String, value: V) {
        let value_size = value.size() as u64;

        if let Some(existing) = self.entries.get_mut(&key) {
            self.used_bytes = self.used_bytes - existing.size() as u64 + value_size;
            *existing = value;
        } else {
            self.used_bytes += key.len() as u64 + value_size;
            self.entries.insert(key.clone(), value);
        }
        self.recency.touch(&key);

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            self.evict_one();
        }
    }

    // == Evict One ==
    /// Unconditionally removes the least recently used entry, if any.
    pub fn evict_one(&mut self) {
        if let Some(key) = self.recency.pop_lru() {
            if let Some(value) = self.entries.remove(&key) {
                self.used_bytes -= key.len() as u64 + value.size() as u64;
                self.evictions += 1;
                if let Some(hook) = self.on_evict.as_mut() {
                    hook(key, value);
                }
            }
        }
    }

    // == Accessors ==
    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently accounted for across keys and values.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Entries evicted since the store was created.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ByteView;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_store_new() {
        let store: ByteStore<ByteView> = ByteStore::new(100, None);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.used_bytes(), 0);
    }

    #[test]
    fn test_store_add_and_get() {
        let mut store = ByteStore::new(100, None);

        store.add("Tom".to_string(), ByteView::from("630"));

        let value = store.get("Tom").expect("entry should be present");
        assert_eq!(value.to_string_lossy(), "630");
        assert_eq!(store.used_bytes(), 6);
    }

    #[test]
    fn test_store_get_missing() {
        let mut store: ByteStore<ByteView> = ByteStore::new(100, None);
        assert!(store.get("missing").is_none());
        assert_eq!(store.used_bytes(), 0);
    }

    #[test]
    fn test_store_replace_adjusts_size() {
        let mut store = ByteStore::new(100, None);

        store.add("k".to_string(), ByteView::from("12"));
        assert_eq!(store.used_bytes(), 3);

        store.add("k".to_string(), ByteView::from("1234"));
        assert_eq!(store.used_bytes(), 5);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").unwrap().to_string_lossy(), "1234");
    }

    #[test]
    fn test_store_oversized_entry_evicted_immediately() {
        // key (8) + value (4) = 12 bytes against a budget of 10: the entry
        // goes in at the front and the trailing loop removes it at once.
        let mut store = ByteStore::new(10, None);

        store.add("testKey1".to_string(), ByteView::from("1235"));

        assert!(store.get("testKey1").is_none());
        assert!(store.is_empty());
        assert_eq!(store.used_bytes(), 0);
        assert_eq!(store.evictions(), 1);
    }

    #[test]
    fn test_store_evicts_least_recently_used() {
        let mut store = ByteStore::new(10, None);

        store.add("k1".to_string(), ByteView::from("abc"));
        store.add("k2".to_string(), ByteView::from("abc"));

        // 5 + 5 = 10 bytes used; one more entry pushes k1 out
        store.add("k3".to_string(), ByteView::from("abc"));

        assert!(store.get("k1").is_none());
        assert!(store.get("k2").is_some());
        assert!(store.get("k3").is_some());
        assert!(store.used_bytes() <= 10);
    }

    #[test]
    fn test_store_get_refreshes_recency() {
        let mut store = ByteStore::new(10, None);

        store.add("k1".to_string(), ByteView::from("abc"));
        store.add("k2".to_string(), ByteView::from("abc"));

        // Touch k1 so k2 becomes the eviction candidate
        store.get("k1");
        store.add("k3".to_string(), ByteView::from("abc"));

        assert!(store.get("k1").is_some());
        assert!(store.get("k2").is_none());
    }

    #[test]
    fn test_store_zero_budget_never_evicts() {
        let mut store = ByteStore::new(0, None);

        for i in 0..64 {
            store.add(format!("key-{i}"), ByteView::from("0123456789"));
        }

        assert_eq!(store.len(), 64);
        assert_eq!(store.evictions(), 0);
    }

    #[test]
    fn test_store_eviction_hook_sees_removed_entries() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let hook: EvictionHook<ByteView> = Box::new(move |key, _value| {
            assert_eq!(key, "k1");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut store = ByteStore::new(10, Some(hook));
        store.add("k1".to_string(), ByteView::from("abc"));
        store.add("k2".to_string(), ByteView::from("abcde"));

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_store_evict_one_on_empty_is_noop() {
        let mut store: ByteStore<ByteView> = ByteStore::new(10, None);
        store.evict_one();
        assert_eq!(store.evictions(), 0);
    }
}
