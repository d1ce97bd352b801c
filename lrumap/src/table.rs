use std::hash::{
    BuildHasher,
    Hash,
};

use hashbrown::Equivalent;
use slab::Slab;

use crate::{
    Error,
    Ptr,
    RandomState,
    Result,
    list::{
        Coupled,
        Links,
        Node,
    },
    private,
};

/// Bucket count used when none is given.
pub const DEFAULT_BUCKETS: usize = 16;

// The table doubles once `len > 3/4 * buckets`.
const LOAD_FACTOR_NUMERATOR: usize = 3;
const LOAD_FACTOR_DENOMINATOR: usize = 4;

#[derive(Debug, Clone)]
pub(crate) struct Pair<K, V> {
    hash: u64,
    key: K,
    value: V,
}

/// An entry removed from a [`BucketedMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedEntry<K, V> {
    /// The removed key.
    pub key: K,
    /// The value it mapped to.
    pub value: V,
    /// The entry's cross-reference at the time of removal, or the end marker.
    /// The partner node still names the removed entry until it is cleared.
    pub dual: Ptr,
}

/// A separate-chaining hash map whose entries can be cross-referenced from
/// another structure.
///
/// Every bucket is a doubly linked chain threaded through one shared slab,
/// so an entry's [`Ptr`] never changes while the entry is live. When an
/// insertion finds more than three quarters as many entries as buckets, the
/// bucket array doubles and every entry is re-threaded into its new chain in
/// place. Cross-references held by or pointing at entries survive growth
/// untouched.
///
/// The hash capability is the `S: BuildHasher` type parameter; equality is
/// `K: Eq`, with lookups accepting any [`Equivalent`] borrowed form.
///
/// # Examples
///
/// ```rust
/// use lrumap::BucketedMap;
///
/// let mut map = BucketedMap::<String, u32>::with_buckets(2);
/// let (ptr, inserted) = map.insert("a".to_string(), 1);
/// assert!(inserted);
///
/// // Updating keeps the node and its position.
/// assert_eq!(map.insert("a".to_string(), 2), (ptr, false));
/// assert_eq!(map.get("a"), Some(&2));
///
/// map.insert("b".to_string(), 3);
/// map.insert("c".to_string(), 4);
/// assert_eq!(map.bucket_count(), 4);
/// assert_eq!(map.entry(ptr), Some((&"a".to_string(), &2)));
/// ```
#[derive(Clone)]
pub struct BucketedMap<K, V, S = RandomState> {
    nodes: Slab<Node<Pair<K, V>>>,
    buckets: Vec<Links>,
    hasher: S,
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, S> std::fmt::Debug for BucketedMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S: Default> Default for BucketedMap<K, V, S> {
    fn default() -> Self {
        BucketedMap::with_buckets_and_hasher(DEFAULT_BUCKETS, S::default())
    }
}

impl<K, V, S> private::Sealed for BucketedMap<K, V, S> {}

impl<K, V, S> Coupled for BucketedMap<K, V, S> {
    fn dual_of(&self, ptr: Ptr) -> Option<Ptr> {
        self.nodes.get(ptr.get()?)?.dual.optional()
    }

    fn couple(&mut self, ptr: Ptr, dual: Ptr) {
        if let Some(node) = ptr.get().and_then(|index| self.nodes.get_mut(index)) {
            node.dual = dual;
        }
    }
}

impl<K, V> BucketedMap<K, V> {
    /// Creates an empty map with [`DEFAULT_BUCKETS`] buckets.
    pub fn new() -> Self {
        BucketedMap::default()
    }

    /// Creates an empty map with `buckets` buckets (at least one).
    pub fn with_buckets(buckets: usize) -> Self {
        BucketedMap::with_buckets_and_hasher(buckets, RandomState::default())
    }
}

impl<K, V, S> BucketedMap<K, V, S> {
    /// Creates an empty map with [`DEFAULT_BUCKETS`] buckets hashing keys
    /// with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        BucketedMap::with_buckets_and_hasher(DEFAULT_BUCKETS, hasher)
    }

    /// Creates an empty map with `buckets` buckets (at least one) hashing
    /// keys with `hasher`.
    pub fn with_buckets_and_hasher(buckets: usize, hasher: S) -> Self {
        BucketedMap {
            nodes: Slab::new(),
            buckets: vec![Links::default(); buckets.max(1)],
            hasher,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The map's hash builder.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Key and value of the entry at `ptr`.
    pub fn entry(&self, ptr: Ptr) -> Option<(&K, &V)> {
        let pair = &self.nodes.get(ptr.get()?)?.value;
        Some((&pair.key, &pair.value))
    }

    /// Key and mutable value of the entry at `ptr`.
    pub fn entry_mut(&mut self, ptr: Ptr) -> Option<(&K, &mut V)> {
        let pair = &mut self.nodes.get_mut(ptr.get()?)?.value;
        Some((&pair.key, &mut pair.value))
    }

    /// The cross-reference held by the entry at `ptr` (the end marker if it
    /// has none).
    pub fn dual(&self, ptr: Ptr) -> Result<Ptr> {
        ptr.get()
            .and_then(|index| self.nodes.get(index))
            .map(|node| node.dual)
            .ok_or(Error::InvalidPosition(ptr))
    }

    /// Sets one side of a cross-reference. The caller is responsible for the
    /// other side.
    pub fn set_dual(&mut self, ptr: Ptr, dual: Ptr) -> Result<()> {
        let node = ptr
            .get()
            .and_then(|index| self.nodes.get_mut(index))
            .ok_or(Error::InvalidPosition(ptr))?;
        node.dual = dual;
        Ok(())
    }

    /// Removes the entry at `ptr` without hashing its key again.
    ///
    /// Like [`remove`](Self::remove), this leaves the partner side of any
    /// cross-reference to the caller.
    pub fn remove_ptr(&mut self, ptr: Ptr) -> Option<RemovedEntry<K, V>> {
        let hash = self.nodes.get(ptr.get()?)?.value.hash;
        let bucket = self.bucket_index(hash);
        let node = self.buckets[bucket].remove(&mut self.nodes, ptr);
        Some(RemovedEntry {
            key: node.value.key,
            value: node.value.value,
            dual: node.dual,
        })
    }

    /// Removes every entry. Partners are not notified; see
    /// [`clear_coupled`](Self::clear_coupled).
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.fill(Links::default());
    }

    /// Removes every entry and clears each partner's back-reference.
    pub fn clear_coupled<C>(&mut self, partner: &mut C)
    where
        C: Coupled + ?Sized,
    {
        for (_, node) in self.nodes.iter() {
            if let Some(dual) = node.dual.optional() {
                partner.decouple(dual);
            }
        }
        self.clear();
    }

    /// Iterates over the entries in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|links| links.iter(&self.nodes))
            .map(|pair| (&pair.key, &pair.value))
    }

    fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn over_load_factor(&self) -> bool {
        self.len() * LOAD_FACTOR_DENOMINATOR > self.buckets.len() * LOAD_FACTOR_NUMERATOR
    }

    fn find_hashed<Q>(&self, hash: u64, key: &Q) -> Option<Ptr>
    where
        Q: ?Sized + Equivalent<K>,
    {
        let mut ptr = self.buckets[self.bucket_index(hash)].head();
        while let Some(index) = ptr.get() {
            let node = &self.nodes[index];
            if node.value.hash == hash && key.equivalent(&node.value.key) {
                return Some(ptr);
            }
            ptr = node.next;
        }
        None
    }

    /// Re-threads every entry into a fresh array of `buckets` chains. Nodes
    /// stay in their slots, so every `Ptr` and dual survives.
    fn rebuild(&mut self, buckets: usize) {
        let old = std::mem::replace(&mut self.buckets, vec![Links::default(); buckets]);
        for links in old {
            let mut ptr = links.head();
            while let Some(index) = ptr.get() {
                let next = self.nodes[index].next;
                let bucket = self.bucket_index(self.nodes[index].value.hash);
                self.buckets[bucket].link_back(&mut self.nodes, ptr);
                ptr = next;
            }
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> BucketedMap<K, V, S> {
    /// Finds the entry for `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<Ptr>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.find_hashed(self.hasher.hash_one(key), key)
    }

    /// Inserts `key` or overwrites its value.
    ///
    /// Returns the entry's position and `true` if a new entry was created.
    /// An update replaces only the value: the node, its position and its
    /// cross-reference are untouched.
    pub fn insert(&mut self, key: K, value: V) -> (Ptr, bool) {
        if self.over_load_factor() {
            let buckets = self.buckets.len() * 2;
            log::debug!(
                "growing bucketed map from {} to {buckets} buckets at {} entries",
                self.buckets.len(),
                self.len()
            );
            self.rebuild(buckets);
        }

        let hash = self.hasher.hash_one(&key);
        if let Some(ptr) = self.find_hashed(hash, &key) {
            self.nodes[ptr.unchecked_get()].value.value = value;
            return (ptr, false);
        }

        let bucket = self.bucket_index(hash);
        let ptr = self.buckets[bucket].push_back(&mut self.nodes, Pair { hash, key, value });
        (ptr, true)
    }

    /// Removes `key`, handing back its entry and cross-reference.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<RemovedEntry<K, V>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let ptr = self.find(key)?;
        self.remove_ptr(ptr)
    }

    /// Removes `key` and clears the partner's back-reference to it.
    pub fn remove_coupled<Q, C>(&mut self, key: &Q, partner: &mut C) -> Option<(K, V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        C: Coupled + ?Sized,
    {
        let removed = self.remove(key)?;
        if let Some(dual) = removed.dual.optional() {
            partner.decouple(dual);
        }
        Some((removed.key, removed.value))
    }

    /// Returns a reference to the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entry(self.find(key)?).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let ptr = self.find(key)?;
        self.entry_mut(ptr).map(|(_, value)| value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.find(key).is_some()
    }

    #[cfg(any(test, all(debug_assertions, feature = "internal-debugging")))]
    #[doc(hidden)]
    pub fn debug_validate(&self) {
        let mut total = 0;
        for (bucket, links) in self.buckets.iter().enumerate() {
            links.debug_validate(&self.nodes);
            total += links.len();

            let mut ptr = links.head();
            while let Some(index) = ptr.get() {
                let node = &self.nodes[index];
                assert_eq!(
                    self.bucket_index(node.value.hash),
                    bucket,
                    "Entry {ptr:?} is chained in the wrong bucket"
                );
                assert_eq!(
                    self.hasher.hash_one(&node.value.key),
                    node.value.hash,
                    "Stale hash stored for {ptr:?}"
                );
                assert_eq!(
                    self.find(&node.value.key),
                    Some(ptr),
                    "Duplicate key chained at {ptr:?}"
                );
                ptr = node.next;
            }
        }
        assert_eq!(total, self.len(), "Chains must cover every entry exactly once");
    }
}
