use std::hash::{
    BuildHasher,
    Hash,
};

use hashbrown::Equivalent;

use crate::{
    BucketedMap,
    DualList,
    Error,
    Ptr,
    RandomState,
    Result,
    list::{
        Coupled,
        cross_link,
    },
    table::DEFAULT_BUCKETS,
};

/// A hash map that remembers the order in which keys were last written.
///
/// Entries live in a [`BucketedMap`]; a payload-free [`DualList`] records
/// their order, oldest first. Each history node and its table entry name each
/// other as duals, so either side resolves to the other in O(1).
///
/// Writing an existing key moves it to the newest end of the history. Reads
/// never reorder. Positions handed out by [`insert`](Self::insert),
/// [`find`](Self::find) and the traversal methods are history positions;
/// [`end`](Self::end) is the marker past the newest entry.
///
/// # Examples
///
/// ```rust
/// use lrumap::LinkedHashMap;
///
/// let mut map = LinkedHashMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
/// map.insert("a", 3);
///
/// assert_eq!(map.iter().collect::<Vec<_>>(), [(&"b", &2), (&"a", &3)]);
///
/// let pos = map.find("b");
/// assert_eq!(map.remove(pos), Ok(("b", 2)));
/// assert_eq!(map.find("b"), map.end());
/// ```
pub struct LinkedHashMap<K, V, S = RandomState> {
    table: BucketedMap<K, V, S>,
    history: DualList<()>,
}

impl<K, V> LinkedHashMap<K, V> {
    /// Creates an empty map with the default bucket count.
    pub fn new() -> Self {
        LinkedHashMap::with_buckets(DEFAULT_BUCKETS)
    }

    /// Creates an empty map with `buckets` buckets (at least one).
    pub fn with_buckets(buckets: usize) -> Self {
        LinkedHashMap::with_buckets_and_hasher(buckets, RandomState::default())
    }
}

impl<K, V, S: Default> Default for LinkedHashMap<K, V, S> {
    fn default() -> Self {
        LinkedHashMap::with_buckets_and_hasher(DEFAULT_BUCKETS, S::default())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    /// Creates an empty map hashing keys with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        LinkedHashMap::with_buckets_and_hasher(DEFAULT_BUCKETS, hasher)
    }

    /// Creates an empty map with `buckets` buckets hashing keys with
    /// `hasher`.
    pub fn with_buckets_and_hasher(buckets: usize, hasher: S) -> Self {
        LinkedHashMap {
            table: BucketedMap::with_buckets_and_hasher(buckets, hasher),
            history: DualList::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current bucket count of the underlying table.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// The map's hash builder.
    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.table.clear();
        self.history.clear();
    }

    /// Position of the oldest entry, or [`end`](Self::end) if empty.
    pub fn begin(&self) -> Ptr {
        self.history.head()
    }

    /// The end marker.
    pub fn end(&self) -> Ptr {
        self.history.end()
    }

    /// Position after `pos` in history order.
    pub fn next_pos(&self, pos: Ptr) -> Result<Ptr> {
        self.history.next_pos(pos)
    }

    /// Position before `pos` in history order. Stepping back from
    /// [`end`](Self::end) yields the newest entry.
    pub fn prev_pos(&self, pos: Ptr) -> Result<Ptr> {
        self.history.prev_pos(pos)
    }

    /// Key and value at history position `pos`.
    pub fn entry_at(&self, pos: Ptr) -> Result<(&K, &V)> {
        let slot = self.history.dual(pos)?;
        self.table.entry(slot).ok_or(Error::InvalidPosition(pos))
    }

    /// Key and mutable value at history position `pos`.
    pub fn entry_at_mut(&mut self, pos: Ptr) -> Result<(&K, &mut V)> {
        let slot = self.history.dual(pos)?;
        self.table.entry_mut(slot).ok_or(Error::InvalidPosition(pos))
    }

    /// The oldest entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.entry_at(self.begin()).ok()
    }

    /// The newest entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.entry_at(self.history.tail()).ok()
    }

    /// Removes the entry at history position `pos`.
    ///
    /// Returns the removed pair. Fails with [`Error::InvalidPosition`] on the
    /// end marker or a position with no live entry, leaving the map
    /// untouched.
    pub fn remove(&mut self, pos: Ptr) -> Result<(K, V)> {
        let slot = self.history.dual(pos)?;
        let removed = self
            .table
            .remove_ptr(slot)
            .ok_or(Error::InvalidPosition(pos))?;
        self.history.erase(pos)?;
        Ok((removed.key, removed.value))
    }

    /// Removes and returns the oldest entry.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        self.remove(self.begin()).ok()
    }

    /// Removes and returns the newest entry.
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        self.remove(self.history.tail()).ok()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            map: self,
            front: self.history.head(),
            back: self.history.tail(),
            remaining: self.len(),
        }
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Values from oldest to newest.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// Moves the entry at table slot `slot` to the newest end of the history
    /// and returns its new history position.
    fn promote_slot(&mut self, slot: Ptr) -> Ptr {
        if let Some(old) = self.table.dual_of(slot) {
            let erased = self.history.erase(old);
            debug_assert!(erased.is_ok(), "Entry {slot:?} named a dead history node");
        }
        let pos = self.history.insert_tail(());
        cross_link(&mut self.table, slot, &mut self.history, pos);
        pos
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LinkedHashMap<K, V, S> {
    /// Inserts `key` or overwrites its value, making it the newest entry.
    ///
    /// Returns the entry's new history position and `true` if the key was
    /// not present before.
    pub fn insert(&mut self, key: K, value: V) -> (Ptr, bool) {
        let (slot, inserted) = self.table.insert(key, value);
        (self.promote_slot(slot), inserted)
    }

    /// Makes `key` the newest entry without touching its value.
    pub(crate) fn promote<Q>(&mut self, key: &Q) -> Option<Ptr>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let slot = self.table.find(key)?;
        Some(self.promote_slot(slot))
    }

    /// History position of `key`, or [`end`](Self::end) if it is absent.
    pub fn find<Q>(&self, key: &Q) -> Ptr
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.table
            .find(key)
            .and_then(|slot| self.table.dual_of(slot))
            .unwrap_or_default()
    }

    /// Value for `key`, failing with [`Error::MissingKey`] if it is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get(key).ok_or(Error::MissingKey)
    }

    /// Mutable counterpart of [`at`](Self::at).
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get_mut(key).ok_or(Error::MissingKey)
    }

    /// Value for `key`. Does not reorder.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.table.get(key)
    }

    /// Mutable value for `key`. Does not reorder.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.table.get_mut(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.table.contains_key(key)
    }

    /// Number of entries for `key`: zero or one.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        usize::from(self.contains_key(key))
    }

    /// Removes `key`, returning its pair.
    pub fn remove_key<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.remove(self.find(key)).ok()
    }

    #[cfg(any(test, all(debug_assertions, feature = "internal-debugging")))]
    #[doc(hidden)]
    pub fn debug_validate(&self) {
        self.table.debug_validate();
        self.history.debug_validate();
        assert_eq!(
            self.table.len(),
            self.history.len(),
            "Table and history disagree on length"
        );

        let mut pos = self.history.head();
        while !pos.is_null() {
            let slot = self
                .history
                .dual_of(pos)
                .unwrap_or_else(|| panic!("History node {pos:?} has no entry"));
            assert_eq!(
                self.table.dual_of(slot),
                Some(pos),
                "Entry {slot:?} does not point back at {pos:?}"
            );
            pos = self
                .history
                .next_pos(pos)
                .unwrap_or_else(|err| panic!("Broken history walk: {err}"));
        }
    }
}

impl<K, V, S> Clone for LinkedHashMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: Clone + BuildHasher,
{
    fn clone(&self) -> Self {
        let mut copy =
            LinkedHashMap::with_buckets_and_hasher(self.bucket_count(), self.hasher().clone());
        for (key, value) in self {
            copy.insert(key.clone(), value.clone());
        }
        copy
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, S> std::fmt::Debug for LinkedHashMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, Q, V, S> std::ops::Index<&Q> for LinkedHashMap<K, V, S>
where
    K: Hash + Eq,
    Q: ?Sized + Hash + Equivalent<K>,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{}", Error::MissingKey),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for LinkedHashMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> FromIterator<(K, V)> for LinkedHashMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = LinkedHashMap::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V, S>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type IntoIter = IntoIter<K, V, S>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { map: self }
    }
}

/// Borrowing iterator over a [`LinkedHashMap`], oldest entry first.
pub struct Iter<'a, K, V, S> {
    map: &'a LinkedHashMap<K, V, S>,
    front: Ptr,
    back: Ptr,
    remaining: usize,
}

impl<K, V, S> Clone for Iter<'_, K, V, S> {
    fn clone(&self) -> Self {
        Iter {
            map: self.map,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let map = self.map;
        let node = map.history.node(self.front)?;
        self.front = node.next;
        self.remaining -= 1;
        map.table.entry(node.dual)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S> DoubleEndedIterator for Iter<'_, K, V, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let map = self.map;
        let node = map.history.node(self.back)?;
        self.back = node.prev;
        self.remaining -= 1;
        map.table.entry(node.dual)
    }
}

impl<K, V, S> ExactSizeIterator for Iter<'_, K, V, S> {}

/// Owning iterator over a [`LinkedHashMap`], oldest entry first.
pub struct IntoIter<K, V, S> {
    map: LinkedHashMap<K, V, S>,
}

impl<K, V, S> Iterator for IntoIter<K, V, S> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.map.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len(), Some(self.map.len()))
    }
}

impl<K, V, S> DoubleEndedIterator for IntoIter<K, V, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map.pop_back()
    }
}

impl<K, V, S> ExactSizeIterator for IntoIter<K, V, S> {}
