//! Recency List Module
//!
//! Doubly-linked list of cache entries ordered by recency of use.
//!
//! Nodes live in a slot arena and link to each other by [`SlotId`], so
//! move-to-front and removal are O(1) without raw pointers. Freed slots are
//! recycled through a free list.

use crate::cache::entry::{Entry, SlotId};

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// - Front (head) = most recently used
/// - Back (tail) = least recently used
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    free_list: Vec<usize>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` nodes before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a new node as the most recently used and returns its handle.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> SlotId {
        let entry = Entry::new(key, value);
        let id = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                SlotId(idx)
            }
            None => {
                self.slots.push(Some(entry));
                SlotId(self.slots.len() - 1)
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    // == Touch ==
    /// Marks a node as most recently used (moves it to the front).
    pub(crate) fn touch(&mut self, id: SlotId) {
        if self.head == Some(id) || self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        self.link_front(id);
    }

    // == Remove ==
    /// Detaches a node and returns its (key, value).
    ///
    /// Returns None if the handle does not refer to a live node.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<(K, V)> {
        if self.node(id).is_none() {
            return None;
        }
        self.unlink(id);
        let entry = self.slots[id.0].take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(entry.into_pair())
    }

    // == Back ==
    /// Returns the least recently used node, if any.
    pub(crate) fn back(&self) -> Option<SlotId> {
        self.tail
    }

    pub(crate) fn get(&self, id: SlotId) -> Option<&Entry<K, V>> {
        self.node(id)
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        self.node_mut(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Iterates from most to least recently used.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn node(&self, id: SlotId) -> Option<&Entry<K, V>> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    fn link_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(entry) = self.node_mut(id) {
            entry.prev = None;
            entry.next = old_head;
        }

        match old_head {
            Some(head_id) => {
                if let Some(head) = self.node_mut(head_id) {
                    head.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }

        self.head = Some(id);
    }

    fn unlink(&mut self, id: SlotId) {
        let (prev, next) = match self.node(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.node_mut(prev_id) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.node_mut(next_id) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(entry) = self.node_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
    }
}

// == Iterator ==
#[cfg(test)]
pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<SlotId>,
}

#[cfg(test)]
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (SlotId, &'a Entry<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let entry = self.list.node(id)?;
        self.cursor = entry.next;
        Some((id, entry))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys_front_to_back<V>(list: &RecencyList<&'static str, V>) -> Vec<&'static str> {
        list.iter().map(|(_, entry)| entry.key).collect()
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<&str, i32> = RecencyList::with_capacity(0);
        assert_eq!(list.len(), 0);
        assert!(list.back().is_none());
    }

    #[test]
    fn test_push_front_orders_by_recency() {
        let mut list = RecencyList::with_capacity(0);

        list.push_front("key1", 1);
        list.push_front("key2", 2);
        list.push_front("key3", 3);

        assert_eq!(list.len(), 3);
        assert_eq!(keys_front_to_back(&list), vec!["key3", "key2", "key1"]);
        // key1 is oldest (added first)
        let back = list.back().unwrap();
        assert_eq!(list.get(back).unwrap().key, "key1");
    }

    #[test]
    fn test_touch_moves_to_front() {
        let mut list = RecencyList::with_capacity(0);

        let a = list.push_front("a", 1);
        list.push_front("b", 2);
        list.push_front("c", 3);

        list.touch(a);

        assert_eq!(keys_front_to_back(&list), vec!["a", "c", "b"]);
        let back = list.back().unwrap();
        assert_eq!(list.get(back).unwrap().key, "b");
    }

    #[test]
    fn test_touch_head_and_tail() {
        let mut list = RecencyList::with_capacity(0);

        let a = list.push_front("a", 1);
        let b = list.push_front("b", 2);

        // Touching the head is a no-op
        list.touch(b);
        assert_eq!(keys_front_to_back(&list), vec!["b", "a"]);

        list.touch(a);
        assert_eq!(keys_front_to_back(&list), vec!["a", "b"]);
        assert_eq!(list.back(), Some(b));
    }

    #[test]
    fn test_remove_middle() {
        let mut list = RecencyList::with_capacity(0);

        list.push_front("key1", 1);
        let key2 = list.push_front("key2", 2);
        list.push_front("key3", 3);

        assert_eq!(list.remove(key2), Some(("key2", 2)));
        assert_eq!(list.len(), 2);
        assert_eq!(keys_front_to_back(&list), vec!["key3", "key1"]);
    }

    #[test]
    fn test_remove_back_until_empty() {
        let mut list = RecencyList::with_capacity(0);

        list.push_front("key1", 1);
        list.push_front("key2", 2);

        let oldest = list.back().unwrap();
        assert_eq!(list.remove(oldest), Some(("key1", 1)));
        let oldest = list.back().unwrap();
        assert_eq!(list.remove(oldest), Some(("key2", 2)));

        assert_eq!(list.len(), 0);
        assert!(list.back().is_none());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_remove_stale_handle() {
        let mut list = RecencyList::with_capacity(0);

        let id = list.push_front("key1", 1);
        assert!(list.remove(id).is_some());

        // Second removal through the same handle does nothing
        assert!(list.remove(id).is_none());
        assert!(list.remove(SlotId(99)).is_none());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = RecencyList::with_capacity(0);

        let first = list.push_front("a", 1);
        list.push_front("b", 2);
        list.remove(first);

        let reused = list.push_front("c", 3);
        assert_eq!(reused, first);
        assert_eq!(keys_front_to_back(&list), vec!["c", "b"]);
    }

    #[test]
    fn test_get_mut_updates_value() {
        let mut list = RecencyList::with_capacity(0);

        let id = list.push_front("key1", 1);
        list.get_mut(id).unwrap().value = 10;

        assert_eq!(list.get(id).unwrap().value, 10);
    }
}
