#![cfg(test)]

// Property tests for AnchorHashMap kept inside the crate so they can call
// the internal invariant walker after every operation.

use crate::map::AnchorHashMap;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;

// Pool-indexed operations so shrinking reduces to earlier keys and shorter
// op lists. Duplicate keys are deliberately common: the pool is tiny.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    RemoveAt(usize),
    RemoveKey(usize),
    Find(usize),
    Rehash(usize),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            5 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::RemoveAt),
            2 => idx.clone().prop_map(Op::RemoveKey),
            3 => idx.clone().prop_map(Op::Find),
            1 => (1usize..64).prop_map(Op::Rehash),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// The model is a per-key multiset: inserts never deduplicate, and which
// duplicate a lookup meets is unspecified (it changes across rehashes), so
// parity is on key presence and value membership, never on which one.
fn check_scenario<S: BuildHasher>(
    mut sut: AnchorHashMap<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, Vec<i32>> = HashMap::new();

    fn model_drop(model: &mut HashMap<String, Vec<i32>>, key: &str, value: i32) {
        let vals = model.get_mut(key).expect("model has the key");
        let at = vals
            .iter()
            .position(|v| *v == value)
            .expect("removed value was tracked");
        vals.swap_remove(at);
        if vals.is_empty() {
            model.remove(key);
        }
    }

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                if sut.insert(k.clone(), v) {
                    model.entry(k).or_default().push(v);
                }
            }
            Op::RemoveAt(i) => {
                let k = &pool[i];
                match sut.find(k.as_str()) {
                    Some(id) => {
                        let (rk, rv) = sut.remove_at(id).expect("freshly found id is live");
                        prop_assert_eq!(&rk, k);
                        prop_assert!(sut.value_at(id).is_none(), "removed id must go stale");
                        model_drop(&mut model, &rk, rv);
                    }
                    None => prop_assert!(!model.contains_key(k)),
                }
            }
            Op::RemoveKey(i) => {
                let k = &pool[i];
                // Peek which entry the scan will meet; removal hits the same
                // one since nothing mutates in between.
                let peek = sut
                    .find(k.as_str())
                    .map(|id| *sut.value_at(id).expect("found id resolves"));
                let removed = sut.remove(k.as_str());
                prop_assert_eq!(removed, peek.is_some());
                prop_assert_eq!(removed, model.contains_key(k));
                if let Some(rv) = peek {
                    model_drop(&mut model, k, rv);
                }
            }
            Op::Find(i) => {
                let k = &pool[i];
                let found = sut.find(k.as_str());
                prop_assert_eq!(found.is_some(), model.contains_key(k));
                if let Some(id) = found {
                    let v = *sut.value_at(id).expect("found id resolves");
                    prop_assert!(
                        model[k].contains(&v),
                        "lookup returned a value that was never inserted"
                    );
                }
            }
            Op::Rehash(n) => {
                let before = sut.bucket_count();
                sut.rehash(n).expect("in-memory rehash succeeds");
                prop_assert_eq!(sut.bucket_count(), before.max(n));
            }
            Op::Iterate => {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for (k, _) in sut.iter() {
                    *counts.entry(k.as_str()).or_default() += 1;
                }
                prop_assert_eq!(counts.len(), model.len());
                for (k, vals) in &model {
                    prop_assert_eq!(counts.get(k.as_str()).copied().unwrap_or(0), vals.len());
                }
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after every op: structural invariants, size
        // parity, and the load-factor bound.
        sut.assert_invariants();
        let total: usize = model.values().map(Vec::len).sum();
        prop_assert_eq!(sut.len(), total);
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.load_factor() <= sut.max_load_factor());
    }
    Ok(())
}

// Property: state-machine equivalence against the multiset model, starting
// from a single bucket so growth rehashes fire constantly.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: AnchorHashMap<String, i32> = AnchorHashMap::new();
        check_scenario(sut, pool, ops)?;
    }
}

// Collision variant: a constant hasher forces every key into bucket 0, so
// the whole map is one run and equality probing does all the work.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: AnchorHashMap<String, i32, ConstBuildHasher> =
            AnchorHashMap::with_buckets_and_hasher(1, ConstBuildHasher);
        check_scenario(sut, pool, ops)?;
    }
}
