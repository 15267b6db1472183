// WordTally integration suite.
//
// The tally is the layer that turns the engine's append-only insert into
// increment-or-create, so these tests pin the collaborator contracts:
// - Find-then-update: repeated adds of one word update one entry, even
//   under full collision (single bucket).
// - Top three: the largest counts come back as a set, order unspecified.
// - Formatting: display renders `(word : count)` pairs.
use anchor_hashmap::{Console, WordTally};
use std::collections::HashSet;
use std::io::Cursor;

// Test: increment-or-create under full collision.
// Assumes: a single bucket puts every word in one run.
// Verifies: adding "a","b","a" yields counts {a:2, b:1}, two entries.
#[test]
fn single_bucket_tally() {
    let mut t: WordTally = WordTally::with_buckets(1);
    t.add("a".to_string());
    t.add("b".to_string());
    t.add("a".to_string());

    assert_eq!(t.len(), 2);
    assert_eq!(t.count("a"), 2);
    assert_eq!(t.count("b"), 1);
}

// Test: bounded top-three extraction.
// Assumes: a fixed three-slot buffer scanned once over all entries.
// Verifies: counts {5,1,9,3,7,2} reduce to the set {9,7,5}, any order.
#[test]
fn top_three_of_six_counts() {
    let mut t: WordTally = WordTally::new();
    for (word, n) in [("e5", 5), ("o1", 1), ("n9", 9), ("t3", 3), ("s7", 7), ("w2", 2)] {
        for _ in 0..n {
            t.add(word.to_string());
        }
    }
    let top: HashSet<(String, u64)> = t
        .top_words()
        .into_iter()
        .map(|(k, c)| (k.clone(), c))
        .collect();
    let expected: HashSet<(String, u64)> = HashSet::from([
        ("n9".to_string(), 9),
        ("s7".to_string(), 7),
        ("e5".to_string(), 5),
    ]);
    assert_eq!(top, expected);
}

// Test: tallies keep working across engine growth.
// Assumes: growth rehashes fire while words accumulate.
// Verifies: every count is exact after many distinct and repeated adds.
#[test]
fn counts_survive_growth() {
    let mut t: WordTally = WordTally::with_buckets(1);
    for round in 1..=3 {
        for i in 0..50 {
            t.add(format!("w{i}"));
        }
        for i in 0..50 {
            assert_eq!(t.count(format!("w{i}").as_str()), round);
        }
    }
    assert_eq!(t.len(), 50);
}

// Test: console end to end.
// Assumes: the menu loop reads digits and talks through its writer.
// Verifies: a typed line is tallied, displayed and sized correctly.
#[test]
fn console_session() {
    let script = "2\nto be or not to be\n4\n6\n5\n9\n";
    let mut out = Vec::new();
    let mut console = Console::new(Cursor::new(script.to_string()), &mut out);
    console.run().unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Tallied 6 words"));
    assert!(out.contains("(to : 2)"));
    assert!(out.contains("(be : 2)"));
    assert!(out.contains("(or : 1)"));
    assert!(out.contains("(not : 1)"));
    assert!(out.contains("\n4\n"), "four distinct words");
}
