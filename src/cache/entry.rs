//! Cache Entry Module
//!
//! Defines the node stored in the recency list.

// == Slot Id ==
/// Stable handle to a node inside the recency list arena.
///
/// A handle stays valid until its node is removed; the slot may then be
/// reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId(pub(crate) usize);

// == Cache Entry ==
/// A single (key, value) pair plus its recency links.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Neighbour closer to the front (more recently used)
    pub(crate) prev: Option<SlotId>,
    /// Neighbour closer to the back (less recently used)
    pub(crate) next: Option<SlotId>,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    /// Consumes the node, dropping its links.
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
