//! # Query Cache Module
//!
//! ## Purpose
//! Bounded memoization for search results, keyed by dataset identity and the
//! normalized query. A pure convenience layer: correctness never depends on a
//! hit, and the matcher stays cache-free.
//!
//! ## Input/Output Specification
//! - **Input**: (dataset id, normalized query) keys and cached values
//! - **Output**: Cached values while fresh, cache statistics
//! - **Eviction**: oldest entry first once the size bound is reached
//!
//! ## Key Features
//! - Keys include the dataset, so an entry never answers for another table
//! - Entries expire after a configurable TTL
//! - Deterministic oldest-first eviction at the size bound

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Cache key: dataset identity plus the already-normalized query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    dataset: String,
    query: String,
}

struct CachedEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

struct CacheInner<V> {
    entries: HashMap<CacheKey, CachedEntry<V>>,
    /// Insertion order, oldest at the front
    order: VecDeque<CacheKey>,
}

/// Cache statistics, served by `/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
}

/// Bounded query cache shared across request handlers
pub struct QueryCache<V> {
    inner: RwLock<CacheInner<V>>,
    max_size: usize,
    ttl_seconds: u64,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(max_size: usize, ttl_seconds: u64) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            max_size,
            ttl_seconds,
        }
    }

    /// Look up a fresh entry for the dataset and normalized query
    pub fn get(&self, dataset: &str, query: &str) -> Option<V> {
        let inner = self.inner.read();
        let key = CacheKey {
            dataset: dataset.to_string(),
            query: query.to_string(),
        };

        let entry = inner.entries.get(&key)?;
        let age = Utc::now()
            .signed_duration_since(entry.inserted_at)
            .num_seconds();
        if age < self.ttl_seconds as i64 {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Insert a value, evicting the oldest entries past the size bound
    pub fn insert(&self, dataset: &str, query: &str, value: V) {
        if self.max_size == 0 {
            return;
        }

        let mut inner = self.inner.write();
        let key = CacheKey {
            dataset: dataset.to_string(),
            query: query.to_string(),
        };

        if !inner.entries.contains_key(&key) {
            inner.order.push_back(key.clone());
        }
        inner.entries.insert(
            key,
            CachedEntry {
                value,
                inserted_at: Utc::now(),
            },
        );

        while inner.entries.len() > self.max_size {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.inner.read().entries.len(),
            max_size: self.max_size,
        }
    }
}
