use std::collections::HashMap;

/// Memoizes query results by their textual cache key.
///
/// One instance lives for the lifetime of an engine. Entries are never
/// evicted and never invalidated by writes: a result computed once keeps
/// being served for its key even after the underlying table changes. That
/// staleness is part of the contract, not an accident, and callers must
/// not rely on a cached read reflecting later mutations.
///
/// Keys are exact text, so two filters that differ only in whitespace
/// occupy distinct entries.
#[derive(Debug)]
pub struct QueryCache<V> {
    entries: HashMap<String, V>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored result for `key` without invoking `compute`, or
    /// runs `compute`, stores its success under `key`, and returns it.
    /// Errors propagate without being stored.
    pub fn get_or_compute<E, F>(&mut self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.entries.get(key) {
            return Ok(hit.clone());
        }
        let value = compute()?;
        self.entries.insert(key.to_string(), value.clone());
        Ok(value)
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_computes_once_per_key() {
        let mut cache: QueryCache<u32> = QueryCache::new();
        let calls = Cell::new(0u32);

        let compute = || -> Result<u32, ()> {
            calls.set(calls.get() + 1);
            Ok(7)
        };

        assert_eq!(cache.get_or_compute("k", compute), Ok(7));
        assert_eq!(calls.get(), 1);

        // Second read must come from the cache.
        let result = cache.get_or_compute("k", || -> Result<u32, ()> {
            calls.set(calls.get() + 1);
            Ok(99)
        });
        assert_eq!(result, Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_distinct_keys_compute_separately() {
        let mut cache: QueryCache<&'static str> = QueryCache::new();
        cache.get_or_compute("a", || Ok::<_, ()>("first")).unwrap();
        cache.get_or_compute("a ", || Ok::<_, ()>("second")).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_are_not_stored() {
        let mut cache: QueryCache<u32> = QueryCache::new();

        let failed: Result<u32, &str> = cache.get_or_compute("k", || Err("boom"));
        assert_eq!(failed, Err("boom"));
        assert!(cache.is_empty());

        // The key is still computable afterwards.
        assert_eq!(cache.get_or_compute("k", || Ok::<_, &str>(3)), Ok(3));
        assert_eq!(cache.len(), 1);
    }
}
