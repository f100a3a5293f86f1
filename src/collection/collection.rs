//! Collection: one tree behind one lock

use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Serialize, Serializer};

use crate::tree::{AvlTree, BTree, RangeEntries, RedBlackTree, DEFAULT_MIN_DEGREE};

use super::errors::{CollectionError, CollectionResult};
use super::kind::TreeKind;

/// Outcome of a collection operation as reported on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
    UnknownTreeType,
}

impl Status {
    /// Wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::NotFound => "error: not found",
            Status::UnknownTreeType => "error: unknown tree type",
        }
    }

    /// Status of a finished operation, if it can be reported in-band
    pub fn of<T>(result: &CollectionResult<T>) -> Option<Status> {
        match result {
            Ok(_) => Some(Status::Ok),
            Err(e) => e.status(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug)]
enum Tree {
    Avl(AvlTree),
    RedBlack(RedBlackTree),
    BTree(BTree),
}

impl Tree {
    fn insert(&mut self, key: &str, value: &str) {
        match self {
            Tree::Avl(t) => t.insert(key, value),
            Tree::RedBlack(t) => t.insert(key, value),
            Tree::BTree(t) => t.insert(key, value),
        };
    }

    fn search(&self, key: &str) -> Option<&str> {
        match self {
            Tree::Avl(t) => t.search(key),
            Tree::RedBlack(t) => t.search(key),
            Tree::BTree(t) => t.search(key),
        }
    }

    fn search_range(&self, lo: &str, hi: &str) -> RangeEntries {
        match self {
            Tree::Avl(t) => t.search_range(lo, hi),
            Tree::RedBlack(t) => t.search_range(lo, hi),
            Tree::BTree(t) => t.search_range(lo, hi),
        }
    }

    fn delete(&mut self, key: &str) -> bool {
        match self {
            Tree::Avl(t) => t.delete(key),
            Tree::RedBlack(t) => t.delete(key),
            Tree::BTree(t) => t.delete(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Tree::Avl(t) => t.len(),
            Tree::RedBlack(t) => t.len(),
            Tree::BTree(t) => t.len(),
        }
    }

    fn entries(&self) -> Vec<(String, String)> {
        match self {
            Tree::Avl(t) => t.entries(),
            Tree::RedBlack(t) => t.entries(),
            Tree::BTree(t) => t.entries(),
        }
    }

    fn check_invariants(&self) -> Result<(), String> {
        match self {
            Tree::Avl(t) => t.check_invariants(),
            Tree::RedBlack(t) => t.check_invariants(),
            Tree::BTree(t) => t.check_invariants(),
        }
    }
}

/// Ordered string key-value store backed by one tree kind.
///
/// The kind is fixed for the collection's lifetime.
#[derive(Debug)]
pub struct Collection {
    kind: TreeKind,
    tree: RwLock<Tree>,
}

impl Collection {
    /// Creates an empty collection; B-trees use [`DEFAULT_MIN_DEGREE`]
    pub fn new(kind: TreeKind) -> Self {
        Self::with_btree_degree(kind, DEFAULT_MIN_DEGREE)
    }

    /// Creates an empty collection, using `min_degree` if `kind` is a B-tree
    pub fn with_btree_degree(kind: TreeKind, min_degree: usize) -> Self {
        let tree = match kind {
            TreeKind::Avl => Tree::Avl(AvlTree::new()),
            TreeKind::RedBlack => Tree::RedBlack(RedBlackTree::new()),
            TreeKind::BTree => Tree::BTree(BTree::with_min_degree(min_degree)),
        };
        Self {
            kind,
            tree: RwLock::new(tree),
        }
    }

    /// Tree kind backing this collection
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    fn read(&self) -> CollectionResult<RwLockReadGuard<'_, Tree>> {
        self.tree.read().map_err(|_| CollectionError::lock_poisoned())
    }

    fn write(&self) -> CollectionResult<RwLockWriteGuard<'_, Tree>> {
        self.tree.write().map_err(|_| CollectionError::lock_poisoned())
    }

    /// Insert or overwrite `key`.
    ///
    /// `secondary_key` is accepted for compatibility and has no effect.
    pub fn set(&self, key: &str, _secondary_key: &str, value: &str) -> CollectionResult<()> {
        self.write()?.insert(key, value);
        Ok(())
    }

    /// Same as `set(key, key, value)`
    pub fn update(&self, key: &str, value: &str) -> CollectionResult<()> {
        self.set(key, key, value)
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> CollectionResult<String> {
        self.read()?
            .search(key)
            .map(str::to_string)
            .ok_or_else(|| CollectionError::key_not_found(key))
    }

    /// Entries with `lo <= key <= hi`
    pub fn get_range(&self, lo: &str, hi: &str) -> CollectionResult<RangeEntries> {
        Ok(self.read()?.search_range(lo, hi))
    }

    /// Remove `key`; absent keys report not found and change nothing.
    pub fn delete(&self, key: &str) -> CollectionResult<()> {
        if self.write()?.delete(key) {
            Ok(())
        } else {
            Err(CollectionError::key_not_found(key))
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> CollectionResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns true if the collection holds no entries
    pub fn is_empty(&self) -> CollectionResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Every entry in ascending key order
    pub fn entries(&self) -> CollectionResult<Vec<(String, String)>> {
        Ok(self.read()?.entries())
    }

    /// Verify the structural invariants of the backing tree.
    pub fn check_invariants(&self) -> Result<(), String> {
        self.read()
            .map_err(|e| e.message().to_string())?
            .check_invariants()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_set_then_get_on_every_kind() {
        for kind in TreeKind::ALL {
            let collection = Collection::new(kind);
            collection.set("a", "a", "1").unwrap();
            assert_eq!(collection.get("a").unwrap(), "1");

            let missing = collection.get("b");
            assert_eq!(Status::of(&missing), Some(Status::NotFound));
            assert_eq!(Status::NotFound.as_str(), "error: not found");
        }
    }

    #[test]
    fn test_update_is_set() {
        let collection = Collection::new(TreeKind::BTree);
        collection.set("k", "ignored", "v1").unwrap();
        collection.update("k", "v2").unwrap();
        assert_eq!(collection.get("k").unwrap(), "v2");
        assert_eq!(collection.len().unwrap(), 1);
    }

    #[test]
    fn test_secondary_key_is_not_indexed() {
        let collection = Collection::new(TreeKind::Avl);
        collection.set("primary", "secondary", "v").unwrap();
        assert!(collection.get("secondary").is_err());
    }

    #[test]
    fn test_delete_reports_not_found() {
        let collection = Collection::new(TreeKind::RedBlack);
        collection.set("a", "a", "1").unwrap();
        assert!(collection.delete("a").is_ok());
        let again = collection.delete("a");
        assert_eq!(Status::of(&again), Some(Status::NotFound));
    }

    #[test]
    fn test_status_serializes_as_wire_string() {
        let json = serde_json::to_string(&Status::Ok).unwrap();
        assert_eq!(json, "\"ok\"");
    }

    #[test]
    fn test_btree_degree_is_applied() {
        let collection = Collection::with_btree_degree(TreeKind::BTree, 2);
        for i in 0..50 {
            collection.set(&format!("{:02}", i), "", "v").unwrap();
        }
        collection.check_invariants().unwrap();
        assert_eq!(collection.len().unwrap(), 50);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        for kind in TreeKind::ALL {
            let collection = Arc::new(Collection::new(kind));
            let mut handles = Vec::new();

            for w in 0..4 {
                let c = Arc::clone(&collection);
                handles.push(thread::spawn(move || {
                    for i in 0..250 {
                        let key = format!("{}-{:03}", w, i);
                        c.set(&key, &key, "v").unwrap();
                    }
                }));
            }
            for _ in 0..4 {
                let c = Arc::clone(&collection);
                handles.push(thread::spawn(move || {
                    for _ in 0..50 {
                        let _ = c.get_range("0", "9").unwrap();
                    }
                }));
            }
            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(collection.len().unwrap(), 1000);
            collection.check_invariants().unwrap();
        }
    }
}
