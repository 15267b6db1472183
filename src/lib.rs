//! anchor-hashmap: a single-threaded hash map that keeps every entry in
//! one shared linked list, bucketed by a table of per-bucket anchors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build the bucket machinery from scratch, in layers small enough
//!   to reason about independently, instead of delegating to a standard
//!   hash container.
//! - Layers:
//!   - EntryList<K, V>: singly linked node storage in a slot arena, fronted
//!     by a sentinel head position. Nodes are addressed by generational
//!     `EntryId`s, so a stale id resolves to `None` rather than aliasing a
//!     reused slot. O(1) splice-after and unlink-after.
//!   - AnchorTable: one slot per bucket holding the position *preceding*
//!     that bucket's first entry, or nothing when the bucket is empty.
//!     Rebuilt wholesale on rehash, never resized in place.
//!   - AnchorHashMap<K, V, S>: the engine. All entries of one bucket form a
//!     contiguous run of the list; inserts splice at the front of the run,
//!     lookups scan it, growth rehashes double the bucket count when the
//!     load factor passes its maximum (1.0 by default).
//!   - WordTally<K, S>: word-frequency collaborator. The engine's `insert`
//!     appends unconditionally and permits duplicate keys; this layer calls
//!     `find` first to get increment-or-create semantics, and offers a
//!     bounded top-three extraction.
//!   - Console: digit-menu front end over any `BufRead`/`Write` pair.
//!
//! Constraints
//! - Single-threaded: no locking, no atomics; sharing an engine across
//!   threads is not supported.
//! - Every position obtained from the engine is invalidated by removing
//!   that entry or by any rehash; generational ids make such use a miss,
//!   not undefined behavior.
//! - `Clone` is a fully independent deep copy; moves and internal swaps are
//!   O(1) and allocation-free, which is what rehash uses to commit.
//!
//! The shared-head hazard
//! - The list head is a single sentinel position that any one bucket's
//!   anchor may occupy at a time. Inserting into an empty bucket moves the
//!   head, so the bucket that owned it must be re-anchored; removing a run's
//!   boundary entry shifts the run that follows onto a new predecessor. Both
//!   fixups re-derive the affected bucket from cached hashes rather than
//!   comparing anchor identities.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash computed at insertion; bucket scans,
//!   removal and rehashing always use the stored hash, and `K: Hash` is
//!   never invoked after insertion.
//!
//! Notes and non-goals
//! - `insert` reports failure as a bare `false` after rolling back, without
//!   distinguishing the cause; `rehash` is the one operation with a typed
//!   error. The map never shrinks and nothing is persisted.
//! - Debug builds panic if key `Eq`/`Hash` code re-enters the map during a
//!   probe; release builds compile the check away.

mod anchors;
mod guard;
pub mod console;
pub mod list;
pub mod map;
mod map_proptest;
pub mod tally;

// Public surface
pub use console::Console;
pub use list::EntryId;
pub use map::{AnchorHashMap, RehashError};
pub use tally::WordTally;
