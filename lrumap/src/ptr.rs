/// A stable handle naming one node of a [`DualList`](crate::DualList) or
/// [`BucketedMap`](crate::BucketedMap).
///
/// A `Ptr` is an index into the arena that owns the node. It stays valid for
/// as long as the node it names is live: table growth never moves nodes, so
/// no handle is invalidated by a resize. [`Ptr::null()`] is the end marker;
/// it names no node and is what traversal yields once it runs off either end
/// of a list.
///
/// Handles carry no generation. Once the node a `Ptr` names is removed, the
/// slot may be reused by a later insertion and the stale handle will then
/// name the new node.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Ptr(usize);

impl std::fmt::Debug for Ptr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "Ptr(end)")
        } else {
            write!(f, "Ptr({})", self.0)
        }
    }
}

impl Default for Ptr {
    fn default() -> Self {
        Ptr::null()
    }
}

impl Ptr {
    /// The end marker.
    pub const fn null() -> Self {
        Ptr(usize::MAX)
    }

    /// Returns `true` if this is the end marker.
    pub const fn is_null(&self) -> bool {
        self.0 == usize::MAX
    }

    pub(crate) fn unchecked_from(index: usize) -> Self {
        debug_assert_ne!(index, usize::MAX, "Index must not be usize::MAX");
        Ptr(index)
    }

    pub(crate) fn unchecked_get(self) -> usize {
        self.0
    }

    pub(crate) fn get(self) -> Option<usize> {
        if self.is_null() { None } else { Some(self.0) }
    }

    pub(crate) fn optional(self) -> Option<Ptr> {
        if self.is_null() { None } else { Some(self) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ptr_null() {
        let null_ptr = Ptr::null();
        assert!(null_ptr.is_null());
        assert_eq!(null_ptr.get(), None);
        assert_eq!(null_ptr.optional(), None);
    }

    #[test]
    fn test_ptr_non_null() {
        let ptr = Ptr::unchecked_from(42);
        assert!(!ptr.is_null());
        assert_eq!(ptr.get(), Some(42));
        assert_eq!(ptr.optional(), Some(ptr));
        assert_eq!(ptr.unchecked_get(), 42);
    }

    #[test]
    fn test_ptr_debug() {
        assert_eq!(format!("{:?}", Ptr::null()), "Ptr(end)");
        assert_eq!(format!("{:?}", Ptr::unchecked_from(7)), "Ptr(7)");
    }

    #[test]
    fn test_ptr_default_is_end() {
        let ptr: Ptr = Default::default();
        assert!(ptr.is_null());
    }
}
