use slab::Slab;

use crate::{
    Error,
    Ptr,
    Result,
    private,
};

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Ptr,
    pub(crate) next: Ptr,
    pub(crate) dual: Ptr,
}

impl<T> Node<T> {
    fn detached(value: T) -> Self {
        Node {
            value,
            prev: Ptr::null(),
            next: Ptr::null(),
            dual: Ptr::null(),
        }
    }
}

/// Head, tail and length of one chain threaded through an arena.
///
/// A `Links` does not own its nodes; every method takes the arena the chain
/// lives in. Several chains may share an arena as long as each node belongs
/// to at most one of them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Links {
    head: Ptr,
    tail: Ptr,
    len: usize,
}

impl Default for Links {
    fn default() -> Self {
        Links {
            head: Ptr::null(),
            tail: Ptr::null(),
            len: 0,
        }
    }
}

impl Links {
    pub(crate) fn head(&self) -> Ptr {
        self.head
    }

    pub(crate) fn tail(&self) -> Ptr {
        self.tail
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn push_back<T>(&mut self, nodes: &mut Slab<Node<T>>, value: T) -> Ptr {
        let ptr = Ptr::unchecked_from(nodes.insert(Node::detached(value)));
        self.link_back(nodes, ptr);
        ptr
    }

    pub(crate) fn push_front<T>(&mut self, nodes: &mut Slab<Node<T>>, value: T) -> Ptr {
        let ptr = Ptr::unchecked_from(nodes.insert(Node::detached(value)));
        self.link_front(nodes, ptr);
        ptr
    }

    /// Threads an already allocated, unlinked node onto the tail.
    pub(crate) fn link_back<T>(&mut self, nodes: &mut Slab<Node<T>>, ptr: Ptr) {
        let tail = self.tail;
        let node = &mut nodes[ptr.unchecked_get()];
        node.prev = tail;
        node.next = Ptr::null();

        match tail.get() {
            Some(tail) => nodes[tail].next = ptr,
            None => self.head = ptr,
        }
        self.tail = ptr;
        self.len += 1;
    }

    pub(crate) fn link_front<T>(&mut self, nodes: &mut Slab<Node<T>>, ptr: Ptr) {
        let head = self.head;
        let node = &mut nodes[ptr.unchecked_get()];
        node.prev = Ptr::null();
        node.next = head;

        match head.get() {
            Some(head) => nodes[head].prev = ptr,
            None => self.tail = ptr,
        }
        self.head = ptr;
        self.len += 1;
    }

    /// Detaches `ptr` from this chain without freeing its slot. The node must
    /// belong to this chain.
    pub(crate) fn unlink<T>(&mut self, nodes: &mut Slab<Node<T>>, ptr: Ptr) {
        let node = &mut nodes[ptr.unchecked_get()];
        let prev = std::mem::take(&mut node.prev);
        let next = std::mem::take(&mut node.next);

        match prev.get() {
            Some(prev) => nodes[prev].next = next,
            None => self.head = next,
        }
        match next.get() {
            Some(next) => nodes[next].prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    pub(crate) fn remove<T>(&mut self, nodes: &mut Slab<Node<T>>, ptr: Ptr) -> Node<T> {
        self.unlink(nodes, ptr);
        nodes.remove(ptr.unchecked_get())
    }

    pub(crate) fn iter<'a, T>(&self, nodes: &'a Slab<Node<T>>) -> ListIter<'a, T> {
        ListIter {
            nodes,
            ptr: self.head,
            remaining: self.len,
        }
    }

    #[cfg(any(test, all(debug_assertions, feature = "internal-debugging")))]
    pub(crate) fn debug_validate<T>(&self, nodes: &Slab<Node<T>>) {
        if self.len == 0 {
            assert!(self.head.is_null(), "Empty chain has a head: {:?}", self.head);
            assert!(self.tail.is_null(), "Empty chain has a tail: {:?}", self.tail);
            return;
        }

        let mut prev = Ptr::null();
        let mut ptr = self.head;
        let mut seen = 0;
        while let Some(index) = ptr.get() {
            let node = nodes
                .get(index)
                .unwrap_or_else(|| panic!("Chain links to a vacant slot: {ptr:?}"));
            assert_eq!(node.prev, prev, "Broken back link at {ptr:?}");
            seen += 1;
            assert!(seen <= self.len, "Chain is longer than its length: {}", self.len);
            prev = ptr;
            ptr = node.next;
        }
        assert_eq!(prev, self.tail, "Walk did not end at the tail");
        assert_eq!(seen, self.len, "Chain length mismatch");
    }
}

/// Maintains one side of a cross-reference between two structures.
///
/// Nodes of a [`DualList`] or a [`BucketedMap`](crate::BucketedMap) may name
/// a node in another structure through their *dual*. A link is symmetric:
/// when node `a` names `b`, `b` names `a`. Whoever removes one side must
/// clear the other through this trait.
pub trait Coupled: private::Sealed {
    /// Returns the dual held by the live node at `ptr`, if it has one.
    fn dual_of(&self, ptr: Ptr) -> Option<Ptr>;

    /// Sets the dual held by the live node at `ptr`. Does nothing if `ptr`
    /// names no live node.
    fn couple(&mut self, ptr: Ptr, dual: Ptr);

    /// Clears the dual held by the node at `ptr`.
    fn decouple(&mut self, ptr: Ptr) {
        self.couple(ptr, Ptr::null());
    }
}

/// Points `a_ptr` in `a` at `b_ptr` in `b` and vice versa.
pub(crate) fn cross_link<A, B>(a: &mut A, a_ptr: Ptr, b: &mut B, b_ptr: Ptr)
where
    A: Coupled + ?Sized,
    B: Coupled + ?Sized,
{
    a.couple(a_ptr, b_ptr);
    b.couple(b_ptr, a_ptr);
}

/// A node removed from a [`DualList`], along with the cross-reference it
/// held when it was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed<T> {
    /// The value the node owned.
    pub value: T,
    /// The node's dual, or the end marker if it had none.
    pub dual: Ptr,
}

/// An order-preserving doubly linked list whose nodes may carry a
/// cross-reference into another structure.
///
/// Nodes live in a slab and link to each other by [`Ptr`], so a node's
/// handle stays valid until that node is removed no matter what else is
/// inserted or removed. Insertion at either end, removal at a known
/// position, and removal of either end are all O(1).
///
/// The end marker ([`Ptr::null()`]) stands in for a sentinel node: it
/// follows the tail, precedes the head, and can never be dereferenced.
///
/// # Examples
///
/// ```rust
/// use lrumap::DualList;
///
/// let mut list = DualList::new();
/// list.insert_tail(2);
/// list.insert_tail(3);
/// list.insert_head(1);
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
///
/// // Erasing returns whatever now occupies the erased index.
/// let second = list.next_pos(list.head()).unwrap();
/// let (now_second, removed) = list.erase(second).unwrap();
/// assert_eq!(removed.value, 2);
/// assert_eq!(list.get(now_second), Ok(&3));
/// ```
///
/// # Cloning
///
/// `clone` copies every node into the same slot it occupied in the source,
/// so each copied node keeps naming its source node's dual and a partner's
/// existing back-references resolve against the copy exactly as they did
/// against the source. That is only meaningful while the copy replaces the
/// source inside a larger structure; two live lists both claiming the same
/// partner nodes break link symmetry.
#[derive(Clone)]
pub struct DualList<T> {
    nodes: Slab<Node<T>>,
    links: Links,
}

impl<T: std::fmt::Debug> std::fmt::Debug for DualList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for DualList<T> {
    fn default() -> Self {
        DualList::new()
    }
}

impl<T> private::Sealed for DualList<T> {}

impl<T> Coupled for DualList<T> {
    fn dual_of(&self, ptr: Ptr) -> Option<Ptr> {
        self.node(ptr)?.dual.optional()
    }

    fn couple(&mut self, ptr: Ptr, dual: Ptr) {
        if let Some(node) = ptr.get().and_then(|index| self.nodes.get_mut(index)) {
            node.dual = dual;
        }
    }
}

impl<T> DualList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        DualList {
            nodes: Slab::new(),
            links: Links::default(),
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        DualList {
            nodes: Slab::with_capacity(capacity),
            links: Links::default(),
        }
    }

    /// Number of nodes in the list.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the list holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the first node, or the end marker if the list is empty.
    pub fn head(&self) -> Ptr {
        self.links.head()
    }

    /// Position of the last node, or the end marker if the list is empty.
    pub fn tail(&self) -> Ptr {
        self.links.tail()
    }

    /// The end marker.
    pub fn end(&self) -> Ptr {
        Ptr::null()
    }

    /// Returns `true` if `pos` names a live node of this list.
    pub fn contains(&self, pos: Ptr) -> bool {
        self.node(pos).is_some()
    }

    /// Appends `value` before the current head and returns its position.
    pub fn insert_head(&mut self, value: T) -> Ptr {
        self.links.push_front(&mut self.nodes, value)
    }

    /// Appends `value` after the current tail and returns its position.
    pub fn insert_tail(&mut self, value: T) -> Ptr {
        self.links.push_back(&mut self.nodes, value)
    }

    /// Returns a reference to the value at `pos`.
    ///
    /// Fails with [`Error::InvalidPosition`] on the end marker or a position
    /// whose node has been removed.
    pub fn get(&self, pos: Ptr) -> Result<&T> {
        self.node(pos)
            .map(|node| &node.value)
            .ok_or(Error::InvalidPosition(pos))
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, pos: Ptr) -> Result<&mut T> {
        pos.get()
            .and_then(|index| self.nodes.get_mut(index))
            .map(|node| &mut node.value)
            .ok_or(Error::InvalidPosition(pos))
    }

    /// Position following `pos`; the end marker after the tail.
    ///
    /// Advancing the end marker itself fails.
    pub fn next_pos(&self, pos: Ptr) -> Result<Ptr> {
        self.node(pos)
            .map(|node| node.next)
            .ok_or(Error::InvalidPosition(pos))
    }

    /// Position preceding `pos`; the end marker before the head.
    ///
    /// Stepping back from the end marker lands on the tail, which fails only
    /// when the list is empty.
    pub fn prev_pos(&self, pos: Ptr) -> Result<Ptr> {
        if pos.is_null() {
            return self
                .tail()
                .optional()
                .ok_or(Error::InvalidPosition(pos));
        }
        self.node(pos)
            .map(|node| node.prev)
            .ok_or(Error::InvalidPosition(pos))
    }

    /// The cross-reference held by the node at `pos` (the end marker if it
    /// has none).
    pub fn dual(&self, pos: Ptr) -> Result<Ptr> {
        self.node(pos)
            .map(|node| node.dual)
            .ok_or(Error::InvalidPosition(pos))
    }

    /// Sets one side of a cross-reference. The caller is responsible for the
    /// other side.
    pub fn set_dual(&mut self, pos: Ptr, dual: Ptr) -> Result<()> {
        let node = pos
            .get()
            .and_then(|index| self.nodes.get_mut(index))
            .ok_or(Error::InvalidPosition(pos))?;
        node.dual = dual;
        Ok(())
    }

    /// Removes the node at `pos`.
    ///
    /// Returns the position now occupying the same index (the removed
    /// node's successor, or the end marker) and the removed node. The
    /// removed node's dual is handed back untouched; use
    /// [`erase_coupled`](Self::erase_coupled) to clear the partner side as
    /// well.
    pub fn erase(&mut self, pos: Ptr) -> Result<(Ptr, Removed<T>)> {
        let next = self.next_pos(pos)?;
        let node = self.links.remove(&mut self.nodes, pos);
        Ok((
            next,
            Removed {
                value: node.value,
                dual: node.dual,
            },
        ))
    }

    /// Removes the node at `pos` and clears its partner's back-reference.
    pub fn erase_coupled<C>(&mut self, pos: Ptr, partner: &mut C) -> Result<(Ptr, T)>
    where
        C: Coupled + ?Sized,
    {
        let (next, removed) = self.erase(pos)?;
        if let Some(dual) = removed.dual.optional() {
            partner.decouple(dual);
        }
        Ok((next, removed.value))
    }

    /// Removes the first node, if any.
    pub fn delete_head(&mut self) -> Option<Removed<T>> {
        let head = self.head().optional()?;
        self.erase(head).ok().map(|(_, removed)| removed)
    }

    /// Removes the last node, if any.
    pub fn delete_tail(&mut self) -> Option<Removed<T>> {
        let tail = self.tail().optional()?;
        self.erase(tail).ok().map(|(_, removed)| removed)
    }

    /// Removes the first node and clears its partner's back-reference.
    pub fn delete_head_coupled<C>(&mut self, partner: &mut C) -> Option<T>
    where
        C: Coupled + ?Sized,
    {
        let head = self.head().optional()?;
        self.erase_coupled(head, partner).ok().map(|(_, value)| value)
    }

    /// Removes the last node and clears its partner's back-reference.
    pub fn delete_tail_coupled<C>(&mut self, partner: &mut C) -> Option<T>
    where
        C: Coupled + ?Sized,
    {
        let tail = self.tail().optional()?;
        self.erase_coupled(tail, partner).ok().map(|(_, value)| value)
    }

    /// Removes every node. Partners are not notified; see
    /// [`clear_coupled`](Self::clear_coupled).
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links = Links::default();
    }

    /// Removes every node and clears each partner's back-reference.
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

    /// Iterates from head to tail.
    pub fn iter(&self) -> ListIter<'_, T> {
        self.links.iter(&self.nodes)
    }

    /// Iterates from tail to head.
    pub fn iter_rev(&self) -> ListIterRev<'_, T> {
        ListIterRev {
            nodes: &self.nodes,
            ptr: self.tail(),
            remaining: self.len(),
        }
    }

    pub(crate) fn node(&self, pos: Ptr) -> Option<&Node<T>> {
        self.nodes.get(pos.get()?)
    }

    #[cfg(any(test, all(debug_assertions, feature = "internal-debugging")))]
    #[doc(hidden)]
    pub fn debug_validate(&self) {
        self.links.debug_validate(&self.nodes);
        assert_eq!(
            self.links.len(),
            self.nodes.len(),
            "Every allocated node must be linked"
        );
    }
}

impl<T> FromIterator<T> for DualList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = DualList::new();
        for value in iter {
            list.insert_tail(value);
        }
        list
    }
}

impl<T> IntoIterator for DualList<T> {
    type IntoIter = ListIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        ListIntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a DualList<T> {
    type IntoIter = ListIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Head-to-tail iterator over a [`DualList`].
#[derive(Debug, Clone)]
pub struct ListIter<'a, T> {
    nodes: &'a Slab<Node<T>>,
    ptr: Ptr,
    remaining: usize,
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.ptr.get()?];
        self.ptr = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ListIter<'_, T> {}

/// Tail-to-head iterator over a [`DualList`].
#[derive(Debug, Clone)]
pub struct ListIterRev<'a, T> {
    nodes: &'a Slab<Node<T>>,
    ptr: Ptr,
    remaining: usize,
}

impl<'a, T> Iterator for ListIterRev<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.ptr.get()?];
        self.ptr = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ListIterRev<'_, T> {}

/// Owning head-to-tail iterator over a [`DualList`].
#[derive(Debug)]
pub struct ListIntoIter<T> {
    list: DualList<T>,
}

impl<T> Iterator for ListIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.delete_head().map(|removed| removed.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for ListIntoIter<T> {}
