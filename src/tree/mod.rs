//! Ordered index structures for arbordb
//!
//! Three self-balancing trees back a collection. Each one stores unique
//! string keys ordered byte-wise and exposes the same small surface:
//! insert (upsert), search, inclusive range search and delete.
//!
//! # Invariants
//!
//! - AVL: every node's |height(left) - height(right)| <= 1
//! - Red-black: black root, no red-red edge, uniform black-height
//! - B-tree: non-root nodes hold [t-1, 2t-1] keys, leaves at equal depth
//!
//! Every tree also provides `check_invariants`, which walks the whole
//! structure and reports the first violation it finds.

mod avl;
mod btree;
mod redblack;

pub use avl::AvlTree;
pub use btree::{BTree, DEFAULT_MIN_DEGREE, MAX_MIN_DEGREE};
pub use redblack::{Color, RedBlackTree};

use std::collections::BTreeMap;

/// Result of an inclusive range search, keyed by entry key.
pub type RangeEntries = BTreeMap<String, String>;
