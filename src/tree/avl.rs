//! AVL tree
//!
//! Height-balanced binary search tree. Children are exclusively owned
//! boxes, so the structure is strictly hierarchical.

use std::cmp::{max, Ordering};

use super::RangeEntries;

type Link = Option<Box<AvlNode>>;

#[derive(Debug)]
struct AvlNode {
    key: String,
    value: String,
    /// Height of the subtree rooted here; a leaf has height 1
    height: usize,
    left: Link,
    right: Link,
}

impl AvlNode {
    fn leaf(key: &str, value: String) -> Box<Self> {
        Box::new(Self {
            key: key.to_string(),
            value,
            height: 1,
            left: None,
            right: None,
        })
    }
}

fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

fn balance(node: &AvlNode) -> isize {
    height(&node.left) as isize - height(&node.right) as isize
}

fn link_balance(link: &Link) -> isize {
    link.as_deref().map_or(0, balance)
}

fn update_height(node: &mut AvlNode) {
    node.height = 1 + max(height(&node.left), height(&node.right));
}

fn rotate_right(mut y: Box<AvlNode>) -> Box<AvlNode> {
    let mut x = match y.left.take() {
        Some(x) => x,
        None => return y,
    };
    y.left = x.right.take();
    update_height(&mut y);
    x.right = Some(y);
    update_height(&mut x);
    x
}

fn rotate_left(mut x: Box<AvlNode>) -> Box<AvlNode> {
    let mut y = match x.right.take() {
        Some(y) => y,
        None => return x,
    };
    x.right = y.left.take();
    update_height(&mut x);
    y.left = Some(x);
    update_height(&mut y);
    y
}

/// Recursive upsert. The rotation case is picked by comparing the inserted
/// key against the heavy child's key.
fn insert(link: Link, key: &str, value: String, inserted: &mut bool) -> Box<AvlNode> {
    let mut node = match link {
        Some(node) => node,
        None => {
            *inserted = true;
            return AvlNode::leaf(key, value);
        }
    };

    match key.cmp(node.key.as_str()) {
        Ordering::Less => node.left = Some(insert(node.left.take(), key, value, inserted)),
        Ordering::Greater => node.right = Some(insert(node.right.take(), key, value, inserted)),
        Ordering::Equal => {
            node.value = value;
            return node;
        }
    }

    update_height(&mut node);
    let bal = balance(&node);

    if bal > 1 {
        let left_left = node.left.as_ref().map_or(false, |l| key < l.key.as_str());
        if !left_left {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if bal < -1 {
        let right_right = node.right.as_ref().map_or(false, |r| key > r.key.as_str());
        if !right_right {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

/// Restore height and balance after a removal somewhere below `node`.
///
/// Post-delete imbalance also depends on the heavy child's own balance,
/// so the double rotation is chosen from that sign.
fn rebalance(mut node: Box<AvlNode>) -> Box<AvlNode> {
    update_height(&mut node);
    let bal = balance(&node);

    if bal > 1 {
        if link_balance(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if bal < -1 {
        if link_balance(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

/// Detach the minimum node of a subtree, returning the rebalanced remainder.
fn take_min(mut node: Box<AvlNode>) -> (Link, Box<AvlNode>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (rest, node)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
    }
}

fn delete(link: Link, key: &str) -> Link {
    let mut node = link?;

    match key.cmp(node.key.as_str()) {
        Ordering::Less => node.left = delete(node.left.take(), key),
        Ordering::Greater => node.right = delete(node.right.take(), key),
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, right) => return right,
            (left, None) => return left,
            (left, Some(right)) => {
                // In-order successor takes the removed node's place
                let (rest, mut successor) = take_min(right);
                successor.left = left;
                successor.right = rest;
                node = successor;
            }
        },
    }

    Some(rebalance(node))
}

fn search_range(link: &Link, lo: &str, hi: &str, out: &mut RangeEntries) {
    let node = match link {
        Some(node) => node,
        None => return,
    };

    if lo < node.key.as_str() {
        search_range(&node.left, lo, hi, out);
    }

    if lo <= node.key.as_str() && node.key.as_str() <= hi {
        out.insert(node.key.clone(), node.value.clone());
    }

    if hi > node.key.as_str() {
        search_range(&node.right, lo, hi, out);
    }
}

fn collect_in_order(link: &Link, out: &mut Vec<(String, String)>) {
    if let Some(node) = link {
        collect_in_order(&node.left, out);
        out.push((node.key.clone(), node.value.clone()));
        collect_in_order(&node.right, out);
    }
}

/// Returns the verified subtree height.
fn verify(link: &Link, lower: Option<&str>, upper: Option<&str>) -> Result<usize, String> {
    let node = match link {
        Some(node) => node,
        None => return Ok(0),
    };

    if lower.map_or(false, |lo| node.key.as_str() <= lo)
        || upper.map_or(false, |hi| node.key.as_str() >= hi)
    {
        return Err(format!("key {:?} is out of order", node.key));
    }

    let left = verify(&node.left, lower, Some(node.key.as_str()))?;
    let right = verify(&node.right, Some(node.key.as_str()), upper)?;

    let expected = 1 + max(left, right);
    if node.height != expected {
        return Err(format!(
            "node {:?} stores height {} but has height {}",
            node.key, node.height, expected
        ));
    }

    if left.abs_diff(right) > 1 {
        return Err(format!(
            "node {:?} is unbalanced ({} vs {})",
            node.key, left, right
        ));
    }

    Ok(expected)
}

/// Height-balanced binary search tree keyed by strings.
#[derive(Debug, Default)]
pub struct AvlTree {
    root: Link,
    len: usize,
}

impl AvlTree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    ///
    /// Returns true if the key was not present before.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> bool {
        let mut inserted = false;
        self.root = Some(insert(self.root.take(), key, value.into(), &mut inserted));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Point lookup
    pub fn search(&self, key: &str) -> Option<&str> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// All entries with `lo <= key <= hi`.
    pub fn search_range(&self, lo: &str, hi: &str) -> RangeEntries {
        let mut out = RangeEntries::new();
        search_range(&self.root, lo, hi, &mut out);
        out
    }

    /// Remove `key`. An absent key leaves the tree untouched and returns false.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.search(key).is_none() {
            return false;
        }
        self.root = delete(self.root.take(), key);
        self.len -= 1;
        true
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the whole tree (0 when empty)
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// In-order snapshot of every entry
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.len);
        collect_in_order(&self.root, &mut out);
        out
    }

    /// Verify ordering, stored heights and the balance factor of every node.
    pub fn check_invariants(&self) -> Result<(), String> {
        verify(&self.root, None, None)?;
        let counted = self.entries().len();
        if counted != self.len {
            return Err(format!("len is {} but tree holds {}", self.len, counted));
        }
        Ok(())
    }
}
