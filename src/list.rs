//! EntryList: arena-backed singly linked storage shared by every bucket.

use slotmap::{DefaultKey, SlotMap};

/// Stable, generational identity of one stored entry.
///
/// Ids obtained before a removal or a rehash of the owning map no longer
/// resolve afterwards; accessors return `None` instead of aliasing a reused
/// slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryId(DefaultKey);

impl EntryId {
    pub(crate) fn new(k: DefaultKey) -> Self {
        EntryId(k)
    }
    pub(crate) fn raw(&self) -> DefaultKey {
        self.0
    }
}

/// A splice position: the sentinel head (before the first entry) or a live
/// node. Splices always happen *after* a position, never at one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pos {
    Head,
    At(EntryId),
}

#[derive(Debug)]
struct Node<K, V> {
    hash: u64,
    key: K,
    value: V,
    next: Option<DefaultKey>,
}

/// Singly linked sequence of entry nodes stored in a slot arena.
///
/// The sentinel is not a node: it is the `Pos::Head` position plus the
/// `head` link below. Every node is owned by the arena and freed with it.
pub struct EntryList<K, V> {
    slots: SlotMap<DefaultKey, Node<K, V>>,
    head: Option<DefaultKey>,
}

impl<K, V> EntryList<K, V> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            head: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn first(&self) -> Option<EntryId> {
        self.head.map(EntryId::new)
    }

    /// Successor of a position, i.e. the node a splice after it would
    /// displace.
    pub fn succ(&self, pos: Pos) -> Option<EntryId> {
        match pos {
            Pos::Head => self.head.map(EntryId::new),
            Pos::At(id) => self.next_of(id),
        }
    }

    pub fn next_of(&self, id: EntryId) -> Option<EntryId> {
        self.slots
            .get(id.raw())
            .and_then(|n| n.next)
            .map(EntryId::new)
    }

    pub fn hash_at(&self, id: EntryId) -> Option<u64> {
        self.slots.get(id.raw()).map(|n| n.hash)
    }

    pub fn key_at(&self, id: EntryId) -> Option<&K> {
        self.slots.get(id.raw()).map(|n| &n.key)
    }

    pub fn value_at(&self, id: EntryId) -> Option<&V> {
        self.slots.get(id.raw()).map(|n| &n.value)
    }

    pub fn value_at_mut(&mut self, id: EntryId) -> Option<&mut V> {
        self.slots.get_mut(id.raw()).map(|n| &mut n.value)
    }

    pub fn pair_at(&self, id: EntryId) -> Option<(&K, &V)> {
        self.slots.get(id.raw()).map(|n| (&n.key, &n.value))
    }

    /// Link a new node immediately after `pos`. O(1), no traversal.
    pub fn insert_after(&mut self, pos: Pos, hash: u64, key: K, value: V) -> EntryId {
        let next = match pos {
            Pos::Head => self.head,
            Pos::At(id) => {
                self.slots
                    .get(id.raw())
                    .expect("insert_after: stale position")
                    .next
            }
        };
        let new = self.slots.insert(Node {
            hash,
            key,
            value,
            next,
        });
        match pos {
            Pos::Head => self.head = Some(new),
            Pos::At(id) => {
                self.slots
                    .get_mut(id.raw())
                    .expect("insert_after: stale position")
                    .next = Some(new)
            }
        }
        EntryId::new(new)
    }

    /// Unlink and return the successor of `pos`. Caller contract: the
    /// successor exists.
    pub fn remove_after(&mut self, pos: Pos) -> (u64, K, V) {
        let victim = self
            .succ(pos)
            .expect("remove_after: position has no successor");
        let node = self
            .slots
            .remove(victim.raw())
            .expect("remove_after: successor vanished");
        match pos {
            Pos::Head => self.head = node.next,
            Pos::At(id) => {
                self.slots
                    .get_mut(id.raw())
                    .expect("remove_after: stale position")
                    .next = node.next
            }
        }
        (node.hash, node.key, node.value)
    }

    /// Detach the first node, if any. Used to drain the list during rehash.
    pub fn pop_front(&mut self) -> Option<(u64, K, V)> {
        if self.head.is_some() {
            Some(self.remove_after(Pos::Head))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cur: self.head,
        }
    }
}

impl<K, V> Default for EntryList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for EntryList<K, V> {
    fn clone(&self) -> Self {
        let mut out = Self::new();
        let mut tail = Pos::Head;
        let mut cur = self.head;
        while let Some(k) = cur {
            let n = &self.slots[k];
            let id = out.insert_after(tail, n.hash, n.key.clone(), n.value.clone());
            tail = Pos::At(id);
            cur = n.next;
        }
        out
    }
}

/// Iterator over entries in list order.
pub struct Iter<'a, K, V> {
    list: &'a EntryList<K, V>,
    cur: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (EntryId, &'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let n = &self.list.slots[k];
        self.cur = n.next;
        Some((EntryId::new(k), &n.key, &n.value))
    }
}
