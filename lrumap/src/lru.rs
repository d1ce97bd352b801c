use std::{
    hash::{
        BuildHasher,
        Hash,
    },
    num::NonZeroUsize,
};

use hashbrown::Equivalent;

use crate::{
    Error,
    LinkedHashMap,
    RandomState,
    Result,
    linked::{
        IntoIter,
        Iter,
    },
};

// Pre-sizing stops here; larger caches grow their table on demand.
const MAX_PRESIZED_BUCKETS: usize = 1 << 16;

/// Bucket count that keeps a full cache of `capacity` entries under the
/// table's load factor.
fn buckets_for(capacity: NonZeroUsize) -> usize {
    (capacity.get().saturating_mul(4) / 3 + 5).min(MAX_PRESIZED_BUCKETS)
}

/// A fixed-capacity cache that evicts the least recently used entry.
///
/// Entries are kept in a [`LinkedHashMap`] ordered from least to most
/// recently used. Both [`save`](Self::save) and [`get`](Self::get) count as
/// a use and move the entry to the most recently used end. When a save
/// pushes the cache past its capacity, entries are evicted from the least
/// recently used end until it fits again.
///
/// Keys need `Hash + Eq`; values need nothing.
///
/// # Examples
///
/// ```rust
/// use std::num::NonZeroUsize;
///
/// use lrumap::LruCache;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
/// cache.save(1, "A");
/// cache.save(2, "B");
///
/// // Reading 1 makes 2 the least recently used entry.
/// assert_eq!(cache.get(&1), Some(&"A"));
/// cache.save(3, "C");
///
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.iter().collect::<Vec<_>>(), [(&1, &"A"), (&3, &"C")]);
/// ```
pub struct LruCache<K, V, S = RandomState> {
    map: LinkedHashMap<K, V, S>,
    capacity: NonZeroUsize,
}

impl<K, V> LruCache<K, V> {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    ///
    /// use lrumap::LruCache;
    ///
    /// let cache: LruCache<i32, String> = LruCache::new(NonZeroUsize::new(100).unwrap());
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: NonZeroUsize) -> Self {
        LruCache::with_hasher(capacity, RandomState::default())
    }

    /// Creates an empty cache from a plain capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    ///
    /// ```rust
    /// use lrumap::{
    ///     Error,
    ///     LruCache,
    /// };
    ///
    /// assert!(LruCache::<u8, u8>::try_new(4).is_ok());
    /// assert_eq!(
    ///     LruCache::<u8, u8>::try_new(0).err(),
    ///     Some(Error::InvalidCapacity)
    /// );
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(LruCache::new)
            .ok_or(Error::InvalidCapacity)
    }
}

impl<K, V, S> LruCache<K, V, S> {
    /// Creates an empty cache holding at most `capacity` entries and hashing
    /// keys with `hasher`.
    pub fn with_hasher(capacity: NonZeroUsize, hasher: S) -> Self {
        LruCache {
            map: LinkedHashMap::with_buckets_and_hasher(buckets_for(capacity), hasher),
            capacity,
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries the cache holds.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Changes the capacity, evicting least recently used entries if the
    /// cache no longer fits.
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    ///
    /// use lrumap::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(4).unwrap());
    /// cache.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
    ///
    /// cache.set_capacity(NonZeroUsize::new(1).unwrap());
    /// assert_eq!(cache.len(), 1);
    /// assert_eq!(cache.peek(&3), Some(&'c'));
    /// ```
    pub fn set_capacity(&mut self, capacity: NonZeroUsize) {
        log::trace!(
            "changing cache capacity from {} to {capacity}",
            self.capacity
        );
        self.capacity = capacity;
        self.evict_to_capacity();
    }

    /// Removes every entry. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// The least recently used entry: the next one to be evicted.
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    ///
    /// use lrumap::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// assert_eq!(cache.tail(), None);
    ///
    /// cache.save(1, "one");
    /// cache.save(2, "two");
    /// assert_eq!(cache.tail(), Some((&1, &"one")));
    /// ```
    pub fn tail(&self) -> Option<(&K, &V)> {
        self.map.front()
    }

    /// Removes and returns the least recently used entry.
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.map.pop_front()
    }

    /// Iterates from least to most recently used without touching the order.
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    ///
    /// use lrumap::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// cache.save("A", 1);
    /// cache.save("B", 2);
    /// cache.save("C", 3);
    /// cache.get(&"A");
    ///
    /// let keys: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, ["B", "C", "A"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        self.map.iter()
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.map.keys()
    }

    /// Values from least to most recently used.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.map.values()
    }

    /// Writes one `key value` line per entry, least recently used first.
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    ///
    /// use lrumap::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// cache.save(1, "A");
    /// cache.save(2, "B");
    ///
    /// let mut out = Vec::new();
    /// cache.write_contents(&mut out).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), "1 A\n2 B\n");
    /// ```
    pub fn write_contents<W>(&self, mut out: W) -> std::io::Result<()>
    where
        W: std::io::Write,
        K: std::fmt::Display,
        V: std::fmt::Display,
    {
        for (key, value) in self.iter() {
            writeln!(out, "{key} {value}")?;
        }
        Ok(())
    }

    fn evict_to_capacity(&mut self) {
        while self.map.len() > self.capacity.get() {
            log::trace!(
                "evicting least recently used entry ({} entries, capacity {})",
                self.map.len(),
                self.capacity
            );
            if self.map.pop_front().is_none() {
                break;
            }
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Caches `value` under `key` and marks it most recently used.
    ///
    /// An existing value for `key` is replaced in place; the cache does not
    /// grow. Otherwise the new entry may push out the least recently used
    /// one.
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    ///
    /// use lrumap::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// cache.save("a", 1);
    /// cache.save("b", 2);
    /// cache.save("a", 10);
    /// assert_eq!(cache.len(), 2);
    ///
    /// cache.save("c", 3);
    /// assert_eq!(cache.peek(&"b"), None);
    /// assert_eq!(cache.peek(&"a"), Some(&10));
    /// ```
    pub fn save(&mut self, key: K, value: V) {
        self.map.insert(key, value);
        self.evict_to_capacity();
    }

    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss changes nothing.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let pos = self.map.promote(key)?;
        self.map.entry_at(pos).ok().map(|(_, value)| value)
    }

    /// Mutable counterpart of [`get`](Self::get). Also marks the entry most
    /// recently used.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let pos = self.map.promote(key)?;
        self.map.entry_at_mut(pos).ok().map(|(_, value)| value)
    }

    /// Returns the value for `key` without changing the eviction order.
    ///
    /// ```rust
    /// use std::num::NonZeroUsize;
    ///
    /// use lrumap::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// cache.save(1, "one");
    /// cache.save(2, "two");
    ///
    /// assert_eq!(cache.peek(&1), Some(&"one"));
    /// cache.save(3, "three");
    /// assert_eq!(cache.peek(&1), None);
    /// ```
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.get(key)
    }

    /// Returns `true` if `key` is cached. Does not count as a use.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.contains_key(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.remove_key(key).map(|(_, value)| value)
    }

    #[cfg(any(test, all(debug_assertions, feature = "internal-debugging")))]
    #[doc(hidden)]
    pub fn debug_validate(&self) {
        self.map.debug_validate();
        assert!(
            self.len() <= self.capacity(),
            "Cache holds {} entries over capacity {}",
            self.len(),
            self.capacity()
        );
    }
}

impl<K, V, S> Clone for LruCache<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: Clone + BuildHasher,
{
    fn clone(&self) -> Self {
        LruCache {
            map: self.map.clone(),
            capacity: self.capacity,
        }
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, S> std::fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("entries", &self.map)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for LruCache<K, V, S> {
    /// Saves every pair in order, evicting as needed.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.save(key, value);
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> FromIterator<(K, V)> for LruCache<K, V, S> {
    /// Builds a cache exactly large enough for the distinct keys in `iter`,
    /// with a capacity of at least one.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map: LinkedHashMap<K, V, S> = iter.into_iter().collect();
        let capacity = NonZeroUsize::new(map.len()).unwrap_or(NonZeroUsize::MIN);
        LruCache { map, capacity }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LruCache<K, V, S> {
    type IntoIter = Iter<'a, K, V, S>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for LruCache<K, V, S> {
    type IntoIter = IntoIter<K, V, S>;
    type Item = (K, V);

    /// Consumes the cache, yielding entries from least to most recently used.
    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}
