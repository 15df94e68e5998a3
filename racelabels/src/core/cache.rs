use crate::core::rounding::Rounding;
use crate::core::tokens::{SessionFields, StandingFields};
use serde::Serialize;
use std::collections::HashMap;
use std::rc::Rc;

/// CacheStats holds the hit and miss counters of a cache since the last invalidation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl std::ops::Add for CacheStats {
    type Output = CacheStats;

    fn add(self, other: CacheStats) -> CacheStats {
        CacheStats {
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
        }
    }
}

/// EntityKey identifies what a field set was computed for. Standings are keyed by car index
/// within their session, sessions by their id alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub session: i32,
    pub index: i32,
}

impl EntityKey {
    pub fn standing(session_id: i32, car_idx: i32) -> EntityKey {
        EntityKey {
            session: session_id,
            index: car_idx,
        }
    }

    pub fn session(session_id: i32) -> EntityKey {
        EntityKey {
            session: session_id,
            index: 0,
        }
    }

    /// Synthetic entities (negative index) have no stable identity and are never cached.
    pub fn is_synthetic(self) -> bool {
        self.index < 0
    }
}

/// FieldCache memoizes computed field sets per (entity key, rounding) within one tick.
#[derive(Debug)]
pub struct FieldCache<V> {
    entries: HashMap<(EntityKey, Rounding), Rc<V>>,
    stats: CacheStats,
}

impl<V> FieldCache<V> {
    pub fn new() -> FieldCache<V> {
        FieldCache {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn get_or_compute<C>(&mut self, key: EntityKey, rounding: Rounding, compute: C) -> Rc<V>
    where
        C: FnOnce() -> V,
    {
        if key.is_synthetic() {
            self.stats.misses += 1;
            return Rc::new(compute());
        }

        if let Some(values) = self.entries.get(&(key, rounding)) {
            self.stats.hits += 1;
            return Rc::clone(values);
        }

        self.stats.misses += 1;
        let values = Rc::new(compute());
        self.entries.insert((key, rounding), Rc::clone(&values));
        values
    }

    /// invalidate_all drops every stored entry and resets the counters.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for FieldCache<V> {
    fn default() -> Self {
        FieldCache::new()
    }
}

/// TickCache holds the standing and the session field caches of the current tick.
#[derive(Debug, Default)]
pub struct TickCache {
    pub standings: FieldCache<StandingFields>,
    pub sessions: FieldCache<SessionFields>,
}

impl TickCache {
    pub fn new() -> TickCache {
        TickCache::default()
    }

    /// begin_tick must be called once per snapshot before any label is rendered against it.
    pub fn begin_tick(&mut self) {
        self.standings.invalidate_all();
        self.sessions.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        self.standings.stats() + self.sessions.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn second_lookup_is_served_from_the_cache() {
        let mut cache: FieldCache<Vec<String>> = FieldCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            vec!["P1".to_owned()]
        };

        let key = EntityKey::standing(0, 4);

        let first = cache.get_or_compute(key, Rounding::default(), compute);
        let second = cache.get_or_compute(key, Rounding::default(), || unreachable!());

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn rounding_is_part_of_the_key() {
        let mut cache: FieldCache<u8> = FieldCache::new();
        let one = cache.get_or_compute(EntityKey::standing(0, 4), Rounding::clamped(1), || 1);
        let three = cache.get_or_compute(EntityKey::standing(0, 4), Rounding::clamped(3), || 3);

        assert_eq!((*one, *three), (1, 3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn invalidation_forces_recomputation() {
        let mut cache: FieldCache<u8> = FieldCache::new();
        let calls = Cell::new(0);

        for _ in 0..2 {
            cache.get_or_compute(EntityKey::standing(0, 7), Rounding::default(), || {
                calls.set(calls.get() + 1);
                0
            });
            cache.invalidate_all();
        }

        assert_eq!(calls.get(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn same_car_in_another_session_is_a_different_entity() {
        let mut cache: FieldCache<u8> = FieldCache::new();
        cache.get_or_compute(EntityKey::standing(0, 4), Rounding::default(), || 1);
        let race = cache.get_or_compute(EntityKey::standing(2, 4), Rounding::default(), || 2);

        assert_eq!(*race, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn negative_keys_are_never_stored() {
        let mut cache: FieldCache<u8> = FieldCache::new();
        let first = cache.get_or_compute(EntityKey::standing(0, -1), Rounding::default(), || 1);
        let second = cache.get_or_compute(EntityKey::standing(0, -1), Rounding::default(), || 2);

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(*second, 2);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn tick_cache_sums_both_domains() {
        let mut cache = TickCache::new();
        cache
            .standings
            .get_or_compute(EntityKey::standing(0, 0), Rounding::default(), StandingFields::new);
        cache
            .sessions
            .get_or_compute(EntityKey::session(0), Rounding::default(), SessionFields::new);
        cache
            .sessions
            .get_or_compute(EntityKey::session(0), Rounding::default(), SessionFields::new);

        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2 });
        cache.begin_tick();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
