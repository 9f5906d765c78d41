//! Dependency-driven memoization for derived node geometry.
//!
//! Each cached value declares which inputs it depends on through a static
//! [`CacheDependencies`] table. Marking an input dirty evicts every value
//! that depends on it, directly or through another cached value; the value
//! is only recomputed when it is next requested.

use std::collections::{HashMap, HashSet};

/// Names of the derived values a node caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    Transform,
    BoundingBox,
    Rotation,
    HoverPath,
    StrokeBox,
    RenderBox,
}

/// Inputs a cached value can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dependency {
    Matrix,
    Parent,
    Width,
    Height,
    Children,
    StrokeWidth,
    Shadow,
    Blur,
    /// Another cached value.
    Cached(CacheKey),
}

/// Immutable table of `key ← dependencies` edges.
#[derive(Debug)]
pub struct CacheDependencies {
    entries: &'static [(CacheKey, &'static [Dependency])],
}

impl CacheDependencies {
    /// The graph used by scene nodes.
    pub const NODE: CacheDependencies = CacheDependencies {
        entries: &[
            (CacheKey::Transform, &[Dependency::Matrix, Dependency::Parent]),
            (
                CacheKey::BoundingBox,
                &[
                    Dependency::Cached(CacheKey::Transform),
                    Dependency::Width,
                    Dependency::Height,
                    Dependency::Children,
                ],
            ),
            (CacheKey::Rotation, &[Dependency::Matrix]),
            (CacheKey::HoverPath, &[Dependency::Width, Dependency::Height]),
            (
                CacheKey::StrokeBox,
                &[
                    Dependency::Cached(CacheKey::BoundingBox),
                    Dependency::StrokeWidth,
                ],
            ),
            (
                CacheKey::RenderBox,
                &[
                    Dependency::Cached(CacheKey::StrokeBox),
                    Dependency::Shadow,
                    Dependency::Blur,
                ],
            ),
        ],
    };

    /// Builds a table from a static edge list.
    pub const fn new(entries: &'static [(CacheKey, &'static [Dependency])]) -> Self {
        Self { entries }
    }

    pub fn dependencies_of(&self, key: CacheKey) -> &'static [Dependency] {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, deps)| *deps)
            .unwrap_or(&[])
    }

    /// Keys that list `dependency` directly.
    pub fn dependents_of(&self, dependency: Dependency) -> impl Iterator<Item = CacheKey> + '_ {
        self.entries
            .iter()
            .filter(move |(_, deps)| deps.contains(&dependency))
            .map(|(key, _)| *key)
    }
}

/// Snapshot of a cache's contents for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheDebugInfo {
    pub cached: Vec<CacheKey>,
    pub dirty: Vec<Dependency>,
}

/// Per-node memo table.
///
/// Values evicted by [`mark_dirty`](Self::mark_dirty) are kept aside and
/// handed back to the compute function on the next [`get`](Self::get), so
/// a value can reuse or release whatever the previous one held.
#[derive(Debug)]
pub struct CacheManager<V> {
    table: &'static CacheDependencies,
    entries: HashMap<CacheKey, V>,
    evicted: HashMap<CacheKey, V>,
    dirty: HashSet<Dependency>,
}

impl<V: Clone> CacheManager<V> {
    pub fn new(table: &'static CacheDependencies) -> Self {
        Self {
            table,
            entries: HashMap::new(),
            evicted: HashMap::new(),
            dirty: HashSet::new(),
        }
    }

    /// Returns the cached value for `key`, computing it if it is missing or stale.
    pub fn get<F>(&mut self, key: CacheKey, compute: F) -> V
    where
        F: FnOnce(Option<V>) -> V,
    {
        if !self.is_stale(key) {
            if let Some(value) = self.entries.get(&key) {
                return value.clone();
            }
        }

        let previous = self
            .entries
            .remove(&key)
            .or_else(|| self.evicted.remove(&key));
        let value = compute(previous);
        self.entries.insert(key, value.clone());
        for dependency in self.table.dependencies_of(key) {
            self.dirty.remove(dependency);
        }
        value
    }

    /// Flags `dependency` and evicts its transitive dependents.
    pub fn mark_dirty(&mut self, dependency: Dependency) {
        self.dirty.insert(dependency);
        let dependents: Vec<CacheKey> = self.table.dependents_of(dependency).collect();
        for key in dependents {
            if let Some(value) = self.entries.remove(&key) {
                self.evicted.insert(key, value);
            }
            self.mark_dirty(Dependency::Cached(key));
        }
    }

    /// The cached value for `key` if it is present and fresh. Never computes.
    pub fn peek(&self, key: CacheKey) -> Option<V> {
        if self.is_stale(key) {
            return None;
        }
        self.entries.get(&key).cloned()
    }

    pub fn is_cached(&self, key: CacheKey) -> bool {
        self.entries.contains_key(&key) && !self.is_stale(key)
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.evicted.clear();
        self.dirty.clear();
    }

    pub fn debug_info(&self) -> CacheDebugInfo {
        let mut cached: Vec<CacheKey> = self.entries.keys().copied().collect();
        let mut dirty: Vec<Dependency> = self.dirty.iter().copied().collect();
        cached.sort();
        dirty.sort();
        CacheDebugInfo { cached, dirty }
    }

    fn is_stale(&self, key: CacheKey) -> bool {
        self.table
            .dependencies_of(key)
            .iter()
            .any(|dependency| self.dirty.contains(dependency))
    }
}
