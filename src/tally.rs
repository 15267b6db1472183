//! WordTally: word-frequency collaborator over the hash map engine.

use crate::map::{AnchorHashMap, Iter};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Entries kept by [`WordTally::top_words`].
const TOP_WORDS: usize = 3;

/// Occurrence counter keyed by word.
///
/// The engine's `insert` is an unconditional append; this layer is where
/// increment-or-create semantics live, by looking the word up first and
/// touching the existing entry in place.
pub struct WordTally<K = String, S = RandomState> {
    counts: AnchorHashMap<K, u64, S>,
}

impl<K: Eq + Hash> WordTally<K> {
    pub fn new() -> Self {
        Self {
            counts: AnchorHashMap::new(),
        }
    }

    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            counts: AnchorHashMap::with_buckets(buckets),
        }
    }
}

impl<K: Eq + Hash> Default for WordTally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> WordTally<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            counts: AnchorHashMap::with_hasher(hasher),
        }
    }

    /// Record one occurrence of `word`. Returns `false` only when a brand
    /// new word could not be kept by the engine.
    pub fn add(&mut self, word: K) -> bool {
        if let Some(id) = self.counts.find(&word) {
            *self
                .counts
                .value_at_mut(id)
                .expect("found id resolves") += 1;
            return true;
        }
        self.counts.insert(word, 1)
    }

    /// Occurrences recorded for `word`; 0 when it was never added.
    pub fn count<Q>(&self, word: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Forget `word` entirely; `true` if it was present.
    pub fn remove<Q>(&mut self, word: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.counts.remove(word)
    }

    /// Distinct words recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, u64> {
        self.counts.iter()
    }

    /// The up to three most frequent words, unordered.
    ///
    /// One pass over the entries with a fixed-size candidate buffer kept
    /// sorted ascending by count: slot 0 is always the current minimum and
    /// is replaced whenever a larger count comes along. Ties fall to
    /// whichever entry iteration met first, and iteration order is
    /// unspecified.
    pub fn top_words(&self) -> Vec<(&K, u64)> {
        let mut entries = self.counts.iter();
        let mut top: Vec<(&K, u64)> = entries
            .by_ref()
            .take(TOP_WORDS)
            .map(|(k, v)| (k, *v))
            .collect();
        if top.len() < TOP_WORDS {
            return top;
        }
        top.sort_by_key(|&(_, c)| c);
        for (k, v) in entries {
            if *v > top[0].1 {
                top[0] = (k, *v);
                top.sort_by_key(|&(_, c)| c);
            }
        }
        top
    }
}

impl<K, S> fmt::Display for WordTally<K, S>
where
    K: Eq + Hash + fmt::Display,
    S: BuildHasher,
{
    /// `(word : count)` pairs in iteration order, space separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in self.counts.iter() {
            write!(f, "({k} : {v}) ")?;
        }
        Ok(())
    }
}
