//! # Calculation Cache
//!
//! Memoizes area and money results by normalized input.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 get_or_insert_with(key, compute)                        │
//! │                                                                         │
//! │   "150,00" x "200"                                                      │
//! │        │ parse                                                          │
//! │        ▼                                                                │
//! │   CacheKey::area(150, 200) = "area:150x200"                             │
//! │        │                                                                │
//! │        ├── read lock ── hit ──► clone entry, hits += 1                  │
//! │        │                                                                │
//! │        └── miss ──► compute (no lock held), misses += 1                 │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                 write lock, insert if still absent                      │
//! │                                                                         │
//! │   Entries are never evicted. clear() drops them all.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two callers missing the same key concurrently both compute; the results
//! are equal and the first insert wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use sgp_core::{AreaResult, MonetaryAmount, Parsed};
use tracing::debug;

// =============================================================================
// Cache Key
// =============================================================================

/// Operation name plus normalized arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// `area:{width}x{height}` with trailing zeros removed, so `150`,
    /// `150.0` and `150,00` share one entry.
    pub fn area(width: Decimal, height: Decimal) -> Self {
        CacheKey(format!("area:{}x{}", width.normalize(), height.normalize()))
    }

    /// `money:{digits}`. Money text is read cents-first, so only the digits
    /// matter.
    pub fn money(input: &str) -> Self {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        CacheKey(format!("money:{}", digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Cached Value
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Area(AreaResult),
    Money(Parsed<MonetaryAmount>),
}

impl CachedValue {
    pub fn into_area(self) -> Option<AreaResult> {
        match self {
            CachedValue::Area(area) => Some(area),
            CachedValue::Money(_) => None,
        }
    }

    pub fn into_money(self) -> Option<Parsed<MonetaryAmount>> {
        match self {
            CachedValue::Money(money) => Some(money),
            CachedValue::Area(_) => None,
        }
    }
}

// =============================================================================
// Calculation Cache
// =============================================================================

/// Unbounded, thread-safe result cache.
#[derive(Debug, Default)]
pub struct CalculationCache {
    entries: RwLock<HashMap<CacheKey, CachedValue>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CalculationCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CachedValue>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CachedValue>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Looks up a key, counting the hit or miss.
    pub fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let found = self.read().get(key).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores a value unless the key is already present.
    pub fn insert(&self, key: CacheKey, value: CachedValue) {
        self.write().entry(key).or_insert(value);
    }

    /// Returns the cached value or computes, stores and returns it.
    pub fn get_or_insert_with(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> CachedValue,
    ) -> CachedValue {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = compute();
        self.write().entry(key).or_insert(value).clone()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&self) {
        let mut entries = self.write();
        let dropped = entries.len();
        entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        debug!(dropped, "Calculation cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgp_core::geometry::calculate_area;
    use sgp_core::money::parse_money;
    use std::str::FromStr;
    use std::sync::Arc;

    #[test]
    fn test_area_key_normalizes_scale() {
        let a = CacheKey::area(Decimal::from(150), Decimal::from(200));
        let b = CacheKey::area(Decimal::from_str("150.00").unwrap(), Decimal::new(2000, 1));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "area:150x200");
    }

    #[test]
    fn test_money_key_keeps_only_digits() {
        assert_eq!(CacheKey::money("R$ 1.234,56"), CacheKey::money("123456"));
        assert_eq!(CacheKey::money("1,00").to_string(), "money:100");
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let cache = CalculationCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let value = cache.get_or_insert_with(CacheKey::area(Decimal::from(150), Decimal::from(200)), || {
                calls += 1;
                CachedValue::Area(calculate_area(150, 200))
            });
            assert_eq!(value.into_area().unwrap().formatted_area, "3,00");
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 2);
    }

    #[test]
    fn test_insert_keeps_first_value() {
        let cache = CalculationCache::new();
        let key = CacheKey::money("100");
        cache.insert(key.clone(), CachedValue::Money(parse_money("100")));
        cache.insert(key.clone(), CachedValue::Money(parse_money("999")));

        let value = cache.get(&key).and_then(CachedValue::into_money).unwrap();
        assert_eq!(value.value.cents, 100);
    }

    #[test]
    fn test_clear_resets_entries_and_counters() {
        let cache = CalculationCache::new();
        cache.get_or_insert_with(CacheKey::money("1"), || CachedValue::Money(parse_money("1")));
        cache.get(&CacheKey::money("1"));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.misses(), 0);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(CalculationCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for n in 0..50 {
                        let w = Decimal::from(100 + (n + i) % 10);
                        cache.get_or_insert_with(CacheKey::area(w, w), || {
                            CachedValue::Area(calculate_area(w, w))
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 10);
        assert_eq!(cache.hits() + cache.misses(), 400);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let cache = Arc::new(CalculationCache::new());
        let poisoner = Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison the cache lock");
        })
        .join();

        cache.insert(CacheKey::money("5"), CachedValue::Money(parse_money("5")));
        assert_eq!(cache.len(), 1);
    }
}
