//! AnchorHashMap: the hash map engine over one shared entry list.

use crate::anchors::AnchorTable;
use crate::guard::ReentryFlag;
use crate::list::{EntryId, EntryList, Pos};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::collections::TryReserveError;
use thiserror::Error;

/// Buckets in a freshly constructed map.
const DEFAULT_BUCKETS: usize = 1;

/// Growth threshold for `len / bucket_count`.
const DEFAULT_MAX_LOAD_FACTOR: f32 = 1.0;

/// Growth failed while building the replacement anchor table. The map is
/// left exactly as it was before the call.
#[derive(Debug, Error)]
#[error("could not allocate an anchor table for {buckets} buckets")]
pub struct RehashError {
    buckets: usize,
    #[source]
    source: TryReserveError,
}

/// Hash map storing every entry in one singly linked list, bucketed by a
/// per-bucket anchor table.
///
/// All entries of a bucket form a contiguous run of the list, and each
/// anchor holds the position *preceding* its bucket's first entry, so both
/// insertion (front of run) and removal splice in O(1) once the run is
/// located. Hashes are computed once at insertion and cached; rehashing and
/// bucket scans never invoke `K: Hash` again.
///
/// `insert` is an unconditional append: duplicate keys coexist as separate
/// entries, and lookups return whichever one the bucket scan meets first.
/// Callers wanting upsert semantics call `find` first (see `WordTally`).
pub struct AnchorHashMap<K, V, S = RandomState> {
    hasher: S,
    entries: EntryList<K, V>,
    anchors: AnchorTable,
    max_load_factor: f32,
    probe: ReentryFlag,
}

#[inline]
pub(crate) fn bucket_of(hash: u64, buckets: usize) -> usize {
    (hash % buckets as u64) as usize
}

/// Splice a pre-hashed entry in front of its bucket's run.
///
/// Empty-bucket case: the entry becomes the head of the whole list and the
/// bucket anchors at `Head`. The displaced head, if any, was the first
/// entry of the run that owned the `Head` anchor until now; that bucket is
/// re-derived from the displaced node's cached hash and re-anchored at the
/// new node.
fn link_prehashed<K, V>(
    entries: &mut EntryList<K, V>,
    anchors: &mut AnchorTable,
    hash: u64,
    key: K,
    value: V,
) -> EntryId {
    let b = bucket_of(hash, anchors.len());
    match anchors.get(b) {
        None => {
            let id = entries.insert_after(Pos::Head, hash, key, value);
            anchors.set(b, Pos::Head);
            if let Some(displaced) = entries.next_of(id) {
                let dh = entries
                    .hash_at(displaced)
                    .expect("displaced head is live");
                anchors.set(bucket_of(dh, anchors.len()), Pos::At(id));
            }
            id
        }
        Some(anchor) => entries.insert_after(anchor, hash, key, value),
    }
}

impl<K, V> AnchorHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_buckets_and_hasher(DEFAULT_BUCKETS, Default::default())
    }

    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_buckets_and_hasher(buckets, Default::default())
    }
}

impl<K, V> Default for AnchorHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> AnchorHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_buckets_and_hasher(DEFAULT_BUCKETS, hasher)
    }

    pub fn with_buckets_and_hasher(buckets: usize, hasher: S) -> Self {
        Self {
            hasher,
            entries: EntryList::new(),
            anchors: AnchorTable::with_buckets(buckets),
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            probe: ReentryFlag::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn load_factor(&self) -> f32 {
        self.len() as f32 / self.bucket_count() as f32
    }

    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Set the growth threshold. Takes effect on the next insert; the map
    /// never shrinks.
    pub fn set_max_load_factor(&mut self, ml: f32) {
        self.max_load_factor = ml;
    }

    /// Append an entry unconditionally; duplicates are permitted.
    ///
    /// Returns `false` only when the insert could not be kept: a growth
    /// rehash was required and failed, in which case the entry is removed
    /// again and the map is back in its pre-call state. The `bool` carries
    /// no further cause.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = {
            let _g = self.probe.enter();
            self.hasher.hash_one(&key)
        };
        let id = link_prehashed(&mut self.entries, &mut self.anchors, hash, key, value);
        if self.load_factor() > self.max_load_factor
            && self.grow(self.bucket_count() * 2).is_err()
        {
            self.remove_at(id);
            return false;
        }
        true
    }

    /// Locate an entry with this key: scan the bucket's run from its
    /// anchor's successor, first match wins. Average O(1), worst case the
    /// run length.
    pub fn find<Q>(&self, key: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.probe.enter();
        let b = bucket_of(self.hasher.hash_one(key), self.bucket_count());
        let anchor = self.anchors.get(b)?;
        let mut cur = self.entries.succ(anchor);
        while let Some(id) = cur {
            let h = self.entries.hash_at(id).expect("linked entry is live");
            if bucket_of(h, self.bucket_count()) != b {
                break;
            }
            let matches = self
                .entries
                .key_at(id)
                .map(|k| k.borrow() == key)
                .unwrap_or(false);
            if matches {
                return Some(id);
            }
            cur = self.entries.next_of(id);
        }
        None
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.find(key)?;
        self.entries.value_at(id)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.find(key)?;
        self.entries.value_at_mut(id)
    }

    pub fn key_at(&self, id: EntryId) -> Option<&K> {
        self.entries.key_at(id)
    }

    pub fn value_at(&self, id: EntryId) -> Option<&V> {
        self.entries.value_at(id)
    }

    pub fn value_at_mut(&mut self, id: EntryId) -> Option<&mut V> {
        self.entries.value_at_mut(id)
    }

    pub fn entry_at(&self, id: EntryId) -> Option<(&K, &V)> {
        self.entries.pair_at(id)
    }

    /// Remove the entry behind `id`, restoring run and anchor invariants.
    /// Stale ids return `None`.
    ///
    /// The in-run predecessor is found by a linear scan from the bucket's
    /// anchor when `id` is not the run's first entry; anchor fixups are
    /// re-derived from cached hashes, never from anchor identity.
    pub fn remove_at(&mut self, id: EntryId) -> Option<(K, V)> {
        let hash = self.entries.hash_at(id)?;
        let b = bucket_of(hash, self.bucket_count());
        let anchor = self
            .anchors
            .get(b)
            .expect("live entry implies a non-empty bucket");

        let mut pred = anchor;
        while self.entries.succ(pred) != Some(id) {
            let step = self
                .entries
                .succ(pred)
                .expect("run ends before the entry it contains");
            pred = Pos::At(step);
        }
        let first_of_run = pred == anchor;

        let next_bucket = self.entries.next_of(id).map(|n| {
            let nh = self.entries.hash_at(n).expect("successor is live");
            bucket_of(nh, self.bucket_count())
        });
        let (_, key, value) = self.entries.remove_after(pred);

        match next_bucket {
            // The removed entry closed its run; the following run was
            // anchored at it and must re-anchor at the predecessor.
            Some(nb) if nb != b => self.anchors.set(nb, pred),
            _ => {}
        }
        if first_of_run && next_bucket != Some(b) {
            // Sole entry of the bucket.
            self.anchors.unset(b);
        }
        Some((key, value))
    }

    /// Remove one entry with this key; `true` if one existed.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find(key) {
            Some(id) => self.remove_at(id).is_some(),
            None => false,
        }
    }

    /// Grow the bucket count to at least `buckets`. `Ok` without change if
    /// the map already has that many; the map never shrinks.
    pub fn rehash(&mut self, buckets: usize) -> Result<(), RehashError> {
        if buckets <= self.bucket_count() {
            return Ok(());
        }
        self.grow(buckets)
    }

    /// Rebuild with `buckets` buckets, reinserting every entry by its
    /// cached hash in traversal order. The only fallible step is the
    /// replacement anchor table and it runs before any entry moves, so an
    /// error leaves the map untouched.
    fn grow(&mut self, buckets: usize) -> Result<(), RehashError> {
        let mut anchors = AnchorTable::try_with_buckets(buckets)
            .map_err(|source| RehashError { buckets, source })?;
        let mut entries = EntryList::new();
        while let Some((hash, key, value)) = self.entries.pop_front() {
            link_prehashed(&mut entries, &mut anchors, hash, key, value);
        }
        self.entries = entries;
        self.anchors = anchors;
        Ok(())
    }

    /// Drop every entry; bucket count and load-factor setting stay.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.anchors.reset();
    }

    /// Iterate `(key, value)` pairs. Order is bucket-grouped but otherwise
    /// unspecified; mutating the map invalidates the iterator.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

impl<K, V, S> Clone for AnchorHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let mut entries = EntryList::new();
        let mut anchors = AnchorTable::with_buckets(self.anchors.len());
        let mut cur = self.entries.first();
        while let Some(id) = cur {
            let hash = self.entries.hash_at(id).expect("linked entry is live");
            let (key, value) = self.entries.pair_at(id).expect("linked entry is live");
            link_prehashed(&mut entries, &mut anchors, hash, key.clone(), value.clone());
            cur = self.entries.next_of(id);
        }
        Self {
            hasher: self.hasher.clone(),
            entries,
            anchors,
            max_load_factor: self.max_load_factor,
            probe: ReentryFlag::new(),
        }
    }
}

/// Iterator over `(key, value)` pairs in store order.
pub struct Iter<'a, K, V> {
    inner: crate::list::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, k, v)| (k, v))
    }
}

#[cfg(test)]
impl<K, V, S> AnchorHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Walk the whole structure and check the run/anchor invariants:
    /// every bucket's entries form one contiguous run, every non-empty
    /// bucket's anchor precedes its run, empty buckets are unanchored,
    /// cached hashes match the hasher, and the arena count matches the
    /// reachable count.
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        let buckets = self.bucket_count();
        let mut runs_seen: HashSet<usize> = HashSet::new();
        let mut prev_bucket: Option<usize> = None;
        let mut pred = Pos::Head;
        let mut reachable = 0usize;

        let mut cur = self.entries.first();
        while let Some(id) = cur {
            let hash = self.entries.hash_at(id).unwrap();
            let key = self.entries.key_at(id).unwrap();
            assert_eq!(hash, self.hasher.hash_one(key), "cached hash is stale");

            let b = bucket_of(hash, buckets);
            if prev_bucket != Some(b) {
                assert!(runs_seen.insert(b), "bucket {b} split into several runs");
                assert_eq!(
                    self.anchors.get(b),
                    Some(pred),
                    "anchor of bucket {b} does not precede its run"
                );
            }
            prev_bucket = Some(b);
            pred = Pos::At(id);
            reachable += 1;
            cur = self.entries.next_of(id);
        }

        assert_eq!(reachable, self.len(), "arena count differs from reachable count");
        for b in 0..buckets {
            if !runs_seen.contains(&b) {
                assert_eq!(self.anchors.get(b), None, "empty bucket {b} is anchored");
            }
        }
    }
}
