//! In-memory analysis result cache
//!
//! Keyed on a digest of the analyzed input so identical content never
//! triggers a second model call within a process run. The cache is an
//! explicit object passed to its consumers, capacity-bounded with
//! oldest-first eviction, and safe to share behind its internal lock.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, RwLock};

/// Derives the cache key for a piece of analyzed text
pub fn cache_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

struct CacheInner<V> {
    map: HashMap<String, V>,
    order: VecDeque<String>,
    capacity: usize,
}

/// Capacity-bounded cache for expensive analysis results
///
/// `get_or_compute` runs the compute closure at most once per distinct key
/// in a single-consumer call sequence. Concurrent misses on the same key
/// may compute more than once; reads and writes themselves are always
/// synchronized.
#[derive(Clone)]
pub struct AnalysisCache<V> {
    inner: Arc<RwLock<CacheInner<V>>>,
}

impl<V: Clone> AnalysisCache<V> {
    /// Creates a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                map: HashMap::new(),
                order: VecDeque::new(),
                capacity: capacity.max(1),
            })),
        }
    }

    /// Returns the cached value for `key`, if present
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.read().ok()?.map.get(key).cloned()
    }

    /// Stores `value` under `key`, evicting the oldest entry when full
    pub fn insert(&self, key: &str, value: V) {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(_) => return,
        };

        if inner.map.contains_key(key) {
            inner.map.insert(key.to_string(), value);
            return;
        }

        if inner.map.len() >= inner.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.map.remove(&oldest);
            }
        }

        inner.map.insert(key.to_string(), value);
        inner.order.push_back(key.to_string());
    }

    /// Returns the cached value for `key`, computing and storing it on a miss
    ///
    /// The lock is not held across the compute await, so the closure is free
    /// to perform arbitrary async work.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(value) = self.get(key) {
            return value;
        }

        let value = compute().await;
        self.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|c| c.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
