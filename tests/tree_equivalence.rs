//! Tree Equivalence Tests
//!
//! Tests for the ordered-tree contract:
//! - All three trees answer every query identically
//! - In-order traversal is strictly ascending
//! - Structural invariants survive mixed insert/delete workloads
//! - Deleting an absent key changes nothing

use arbordb::collection::{Collection, Status, TreeKind};
use arbordb::tree::{AvlTree, BTree, RangeEntries, RedBlackTree};
use std::collections::BTreeMap;

// =============================================================================
// Helper Functions
// =============================================================================

/// Deterministic key stream (64-bit LCG), so failures reproduce.
struct KeyStream(u64);

impl KeyStream {
    fn next_key(&mut self, space: u64) -> String {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        format!("k{:04}", (self.0 >> 33) % space)
    }
}

enum Op {
    Insert(String, String),
    Delete(String),
}

fn workload(seed: u64, len: usize, space: u64) -> Vec<Op> {
    let mut keys = KeyStream(seed);
    (0..len)
        .map(|i| {
            let key = keys.next_key(space);
            if i % 3 == 2 {
                Op::Delete(key)
            } else {
                Op::Insert(key, format!("v{}", i))
            }
        })
        .collect()
}

fn check_all(avl: &AvlTree, rb: &RedBlackTree, bt: &BTree) {
    avl.check_invariants().unwrap();
    rb.check_invariants().unwrap();
    bt.check_invariants().unwrap();
}

// =============================================================================
// Cross-Variant Equivalence
// =============================================================================

/// Every tree agrees with a BTreeMap model after each step.
#[test]
fn test_trees_match_model() {
    let mut model: BTreeMap<String, String> = BTreeMap::new();
    let mut avl = AvlTree::new();
    let mut rb = RedBlackTree::new();
    let mut bt = BTree::with_min_degree(2);

    for op in workload(7, 1500, 300) {
        match op {
            Op::Insert(k, v) => {
                let fresh = model.insert(k.clone(), v.clone()).is_none();
                assert_eq!(avl.insert(&k, v.clone()), fresh);
                assert_eq!(rb.insert(&k, v.clone()), fresh);
                assert_eq!(bt.insert(&k, v), fresh);
            }
            Op::Delete(k) => {
                let present = model.remove(&k).is_some();
                assert_eq!(avl.delete(&k), present);
                assert_eq!(rb.delete(&k), present);
                assert_eq!(bt.delete(&k), present);
            }
        }
    }

    check_all(&avl, &rb, &bt);
    let expected: Vec<(String, String)> = model.into_iter().collect();
    assert_eq!(avl.entries(), expected);
    assert_eq!(rb.entries(), expected);
    assert_eq!(bt.entries(), expected);
}

/// Range queries agree across kinds, including inverted and empty ranges.
#[test]
fn test_ranges_agree() {
    let mut avl = AvlTree::new();
    let mut rb = RedBlackTree::new();
    let mut bt = BTree::new();

    for i in (0..200).step_by(3) {
        let k = format!("{:03}", i);
        avl.insert(&k, k.clone());
        rb.insert(&k, k.clone());
        bt.insert(&k, k.clone());
    }

    for (lo, hi) in [("000", "199"), ("010", "020"), ("011", "011"), ("150", "100"), ("x", "z")] {
        let expected: RangeEntries = avl.search_range(lo, hi);
        assert_eq!(rb.search_range(lo, hi), expected, "redblack {}..{}", lo, hi);
        assert_eq!(bt.search_range(lo, hi), expected, "btree {}..{}", lo, hi);
        assert!(expected.keys().all(|k| lo <= k.as_str() && k.as_str() <= hi));
    }

    assert_eq!(avl.search_range("011", "011").len(), 0);
    assert_eq!(avl.search_range("012", "012").len(), 1);
    assert!(avl.search_range("150", "100").is_empty());
}

// =============================================================================
// Order and Balance
// =============================================================================

/// In-order traversal is strictly ascending regardless of insert order.
#[test]
fn test_traversal_is_ascending() {
    let mut bt = BTree::with_min_degree(4);
    let mut avl = AvlTree::new();
    for i in (0..500).rev() {
        let k = format!("{:05}", (i * 7919) % 500);
        bt.insert(&k, "v");
        avl.insert(&k, "v");
    }
    for entries in [bt.entries(), avl.entries()] {
        assert_eq!(entries.len(), 500);
        assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

/// Sequential inserts keep the AVL height logarithmic.
#[test]
fn test_avl_height_bound() {
    let mut avl = AvlTree::new();
    for i in 0..1023 {
        avl.insert(&format!("{:05}", i), "v");
    }
    // 1.44 * log2(1024) rounded up
    assert!(avl.height() <= 15, "height {}", avl.height());
    avl.check_invariants().unwrap();
}

/// Byte-wise ordering: uppercase sorts before lowercase.
#[test]
fn test_byte_wise_order() {
    let mut rb = RedBlackTree::new();
    for k in ["b", "B", "a", "A", "_"] {
        rb.insert(k, k);
    }
    let keys: Vec<String> = rb.entries().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["A", "B", "_", "a", "b"]);
}

// =============================================================================
// Collection Contract
// =============================================================================

/// Delete of an absent key reports not found and leaves contents alone.
#[test]
fn test_delete_idempotence_on_collections() {
    for kind in TreeKind::ALL {
        let collection = Collection::new(kind);
        for k in ["a", "b", "c"] {
            collection.set(k, k, k).unwrap();
        }
        let before = collection.entries().unwrap();

        let result = collection.delete("zzz");
        assert_eq!(Status::of(&result), Some(Status::NotFound));
        assert_eq!(collection.entries().unwrap(), before);
        collection.check_invariants().unwrap();
    }
}

/// Every kind reports the same statuses for the same operations.
#[test]
fn test_statuses_agree_across_kinds() {
    let statuses: Vec<Vec<Option<Status>>> = TreeKind::ALL
        .iter()
        .map(|kind| {
            let c = Collection::new(*kind);
            vec![
                Status::of(&c.set("k", "", "v")),
                Status::of(&c.get("k")),
                Status::of(&c.get("missing")),
                Status::of(&c.delete("k")),
                Status::of(&c.delete("k")),
            ]
        })
        .collect();

    assert!(statuses.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(
        statuses[0],
        vec![
            Some(Status::Ok),
            Some(Status::Ok),
            Some(Status::NotFound),
            Some(Status::Ok),
            Some(Status::NotFound),
        ]
    );
}
