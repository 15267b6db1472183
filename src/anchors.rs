//! AnchorTable: per-bucket positions into the shared entry list.

use crate::list::Pos;
use std::collections::TryReserveError;

/// One `Option<Pos>` slot per bucket; `None` marks an empty bucket, `Some`
/// holds the position immediately *preceding* the bucket's first entry.
///
/// The table is never resized in place: rehash builds a fresh one and the
/// engine swaps it in wholesale.
#[derive(Clone, Debug)]
pub(crate) struct AnchorTable {
    slots: Vec<Option<Pos>>,
}

impl AnchorTable {
    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            slots: vec![None; buckets.max(1)],
        }
    }

    /// Fallible variant used by rehash: growth failure must surface before
    /// any entry has moved.
    pub fn try_with_buckets(buckets: usize) -> Result<Self, TryReserveError> {
        let buckets = buckets.max(1);
        let mut slots = Vec::new();
        slots.try_reserve_exact(buckets)?;
        slots.resize(buckets, None);
        Ok(Self { slots })
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, bucket: usize) -> Option<Pos> {
        self.slots[bucket]
    }

    pub fn set(&mut self, bucket: usize, pos: Pos) {
        self.slots[bucket] = Some(pos);
    }

    pub fn unset(&mut self, bucket: usize) {
        self.slots[bucket] = None;
    }

    /// Mark every bucket empty, keeping the bucket count.
    pub fn reset(&mut self) {
        self.slots.fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::EntryId;
    use slotmap::{DefaultKey, KeyData};

    fn id(n: u64) -> EntryId {
        EntryId::new(DefaultKey::from(KeyData::from_ffi(n)))
    }

    /// Invariant: a fresh table has every bucket empty and at least one slot.
    #[test]
    fn starts_empty() {
        let t = AnchorTable::with_buckets(4);
        assert_eq!(t.len(), 4);
        assert!((0..4).all(|b| t.get(b).is_none()));

        // Zero buckets is clamped rather than allowed to divide by zero.
        assert_eq!(AnchorTable::with_buckets(0).len(), 1);
    }

    /// Invariant: set/unset touch exactly one slot; reset clears them all
    /// without changing the bucket count.
    #[test]
    fn set_unset_reset() {
        let mut t = AnchorTable::with_buckets(3);
        t.set(0, Pos::Head);
        t.set(2, Pos::At(id(1)));
        assert_eq!(t.get(0), Some(Pos::Head));
        assert!(t.get(1).is_none());
        assert_eq!(t.get(2), Some(Pos::At(id(1))));

        t.unset(0);
        assert!(t.get(0).is_none());
        assert_eq!(t.get(2), Some(Pos::At(id(1))));

        t.reset();
        assert!((0..3).all(|b| t.get(b).is_none()));
        assert_eq!(t.len(), 3);
    }

    /// Invariant: the fallible constructor matches the infallible one on
    /// success.
    #[test]
    fn try_with_buckets_matches() {
        let t = AnchorTable::try_with_buckets(8).unwrap();
        assert_eq!(t.len(), 8);
        assert!((0..8).all(|b| t.get(b).is_none()));
        assert_eq!(AnchorTable::try_with_buckets(0).unwrap().len(), 1);
    }
}
