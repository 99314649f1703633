//! Bounded synthesis cache.
//!
//! Content-addressed by a fingerprint of the (text, language) pair,
//! insertion-ordered, evicting the earliest-inserted entry when full.
//! Eviction is strict FIFO, irrespective of how often an entry has been
//! read — deliberately not LRU.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

/// Default number of synthesized clips kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Deterministic fingerprint of a synthesis request.
///
/// SHA-256 over the trimmed text and the lowercased language tag, with a
/// separator byte so field boundaries cannot collide.
pub fn fingerprint(text: &str, language: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    hasher.update([0x1f]);
    hasher.update(language.trim().to_ascii_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

struct CacheInner {
    entries: HashMap<String, Vec<u8>>,
    /// Insertion order, oldest at the front.
    order: VecDeque<String>,
}

/// Size-bounded store of previously synthesized audio.
///
/// `get`/`put` are O(1) and serialized by a single mutex; the cache is
/// small enough that finer-grained locking is not warranted. The cache
/// never calls the synthesizer itself.
pub struct SynthesisCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl SynthesisCache {
    /// Create a cache bounded at `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Look up cached audio by fingerprint. Never mutates state.
    pub fn get(&self, fingerprint: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock().expect("synthesis cache lock poisoned");
        inner.entries.get(fingerprint).cloned()
    }

    /// Insert an entry, evicting the earliest-inserted entry first when
    /// at capacity. Re-inserting an existing fingerprint overwrites the
    /// stored bytes without touching insertion order.
    pub fn put(&self, fingerprint: &str, audio: Vec<u8>) {
        let mut inner = self.inner.lock().expect("synthesis cache lock poisoned");

        if let Some(existing) = inner.entries.get_mut(fingerprint) {
            *existing = audio;
            return;
        }

        while inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            } else {
                break;
            }
        }

        inner.order.push_back(fingerprint.to_string());
        inner.entries.insert(fingerprint.to_string(), audio);
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("synthesis cache lock poisoned")
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
