//! B-tree of fixed minimum degree
//!
//! With minimum degree `t`, every node except the root holds between
//! `t - 1` and `2t - 1` keys. Insertion splits full nodes on the way down;
//! deletion makes sure a child has at least `t` keys before descending into
//! it, borrowing from a sibling or merging when necessary. Both passes are
//! single top-down descents.

use std::mem;

use super::RangeEntries;

/// Minimum degree used when a collection does not ask for another one
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// Largest accepted minimum degree
pub const MAX_MIN_DEGREE: usize = 1024;

#[derive(Debug)]
struct BNode {
    keys: Vec<String>,
    values: Vec<String>,
    children: Vec<BNode>,
    leaf: bool,
}

impl BNode {
    fn new(leaf: bool) -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            children: Vec::new(),
            leaf,
        }
    }

    /// Index of the first key >= `key`
    fn find_key(&self, key: &str) -> usize {
        self.keys
            .iter()
            .position(|k| k.as_str() >= key)
            .unwrap_or(self.keys.len())
    }

    fn search_mut(&mut self, key: &str) -> Option<&mut String> {
        let idx = self.find_key(key);
        if idx < self.keys.len() && self.keys[idx] == key {
            return Some(&mut self.values[idx]);
        }
        if self.leaf {
            return None;
        }
        self.children[idx].search_mut(key)
    }

    /// Split the full child at `i`; its median moves up into this node.
    fn split_child(&mut self, i: usize, t: usize) {
        let child = &mut self.children[i];
        let mut sibling = BNode::new(child.leaf);

        sibling.keys = child.keys.split_off(t);
        sibling.values = child.values.split_off(t);
        if !child.leaf {
            sibling.children = child.children.split_off(t);
        }

        let median_key = child.keys.remove(t - 1);
        let median_value = child.values.remove(t - 1);

        self.keys.insert(i, median_key);
        self.values.insert(i, median_value);
        self.children.insert(i + 1, sibling);
    }

    fn insert_non_full(&mut self, key: &str, value: String, t: usize) {
        let mut i = self
            .keys
            .iter()
            .position(|k| key < k.as_str())
            .unwrap_or(self.keys.len());

        if self.leaf {
            self.keys.insert(i, key.to_string());
            self.values.insert(i, value);
            return;
        }

        if self.children[i].keys.len() == 2 * t - 1 {
            self.split_child(i, t);
            if key > self.keys[i].as_str() {
                i += 1;
            }
        }
        self.children[i].insert_non_full(key, value, t);
    }

    fn search_range(&self, lo: &str, hi: &str, out: &mut RangeEntries) {
        let n = self.keys.len();
        for i in 0..=n {
            if !self.leaf {
                // child i holds keys strictly between keys[i - 1] and keys[i]
                let may_reach_lo = i == n || self.keys[i].as_str() > lo;
                let may_reach_hi = i == 0 || self.keys[i - 1].as_str() < hi;
                if may_reach_lo && may_reach_hi {
                    self.children[i].search_range(lo, hi, out);
                }
            }

            if i < n {
                let key = self.keys[i].as_str();
                if key > hi {
                    break;
                }
                if key >= lo {
                    out.insert(key.to_string(), self.values[i].clone());
                }
            }
        }
    }

    fn max_entry(&self) -> (String, String) {
        let mut node = self;
        while !node.leaf {
            node = &node.children[node.children.len() - 1];
        }
        let last = node.keys.len() - 1;
        (node.keys[last].clone(), node.values[last].clone())
    }

    fn min_entry(&self) -> (String, String) {
        let mut node = self;
        while !node.leaf {
            node = &node.children[0];
        }
        (node.keys[0].clone(), node.values[0].clone())
    }

    fn remove(&mut self, key: &str, t: usize) {
        let idx = self.find_key(key);

        if idx < self.keys.len() && self.keys[idx] == key {
            if self.leaf {
                self.keys.remove(idx);
                self.values.remove(idx);
            } else if self.children[idx].keys.len() >= t {
                let (pred_key, pred_value) = self.children[idx].max_entry();
                self.children[idx].remove(&pred_key, t);
                self.keys[idx] = pred_key;
                self.values[idx] = pred_value;
            } else if self.children[idx + 1].keys.len() >= t {
                let (succ_key, succ_value) = self.children[idx + 1].min_entry();
                self.children[idx + 1].remove(&succ_key, t);
                self.keys[idx] = succ_key;
                self.values[idx] = succ_value;
            } else {
                self.merge(idx);
                self.children[idx].remove(key, t);
            }
            return;
        }

        if self.leaf {
            return;
        }

        let was_last = idx == self.keys.len();
        if self.children[idx].keys.len() < t {
            self.fill(idx, t);
        }

        // filling the last child may merge it into its left neighbour
        if was_last && idx > self.keys.len() {
            self.children[idx - 1].remove(key, t);
        } else {
            self.children[idx].remove(key, t);
        }
    }

    /// Give the child at `idx` at least `t` keys.
    fn fill(&mut self, idx: usize, t: usize) {
        let n = self.keys.len();
        if idx != 0 && self.children[idx - 1].keys.len() >= t {
            self.borrow_from_prev(idx);
        } else if idx != n && self.children[idx + 1].keys.len() >= t {
            self.borrow_from_next(idx);
        } else if idx != n {
            self.merge(idx);
        } else {
            self.merge(idx - 1);
        }
    }

    fn borrow_from_prev(&mut self, idx: usize) {
        let (left, right) = self.children.split_at_mut(idx);
        let sibling = &mut left[idx - 1];
        let child = &mut right[0];

        let (Some(key), Some(value)) = (sibling.keys.pop(), sibling.values.pop()) else {
            return;
        };
        let separator_key = mem::replace(&mut self.keys[idx - 1], key);
        let separator_value = mem::replace(&mut self.values[idx - 1], value);

        child.keys.insert(0, separator_key);
        child.values.insert(0, separator_value);
        if !child.leaf {
            if let Some(grandchild) = sibling.children.pop() {
                child.children.insert(0, grandchild);
            }
        }
    }

    fn borrow_from_next(&mut self, idx: usize) {
        let (left, right) = self.children.split_at_mut(idx + 1);
        let child = &mut left[idx];
        let sibling = &mut right[0];

        let key = sibling.keys.remove(0);
        let value = sibling.values.remove(0);
        let separator_key = mem::replace(&mut self.keys[idx], key);
        let separator_value = mem::replace(&mut self.values[idx], value);

        child.keys.push(separator_key);
        child.values.push(separator_value);
        if !child.leaf {
            child.children.push(sibling.children.remove(0));
        }
    }

    /// Fold child `idx + 1` and the separator at `idx` into child `idx`.
    fn merge(&mut self, idx: usize) {
        let sibling = self.children.remove(idx + 1);
        let separator_key = self.keys.remove(idx);
        let separator_value = self.values.remove(idx);

        let child = &mut self.children[idx];
        child.keys.push(separator_key);
        child.values.push(separator_value);
        child.keys.extend(sibling.keys);
        child.values.extend(sibling.values);
        child.children.extend(sibling.children);
    }

    fn collect_in_order(&self, out: &mut Vec<(String, String)>) {
        for i in 0..self.keys.len() {
            if !self.leaf {
                self.children[i].collect_in_order(out);
            }
            out.push((self.keys[i].clone(), self.values[i].clone()));
        }
        if !self.leaf {
            if let Some(last) = self.children.last() {
                last.collect_in_order(out);
            }
        }
    }
}

/// B-tree keyed by strings.
#[derive(Debug)]
pub struct BTree {
    root: BNode,
    min_degree: usize,
    len: usize,
}

impl Default for BTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BTree {
    /// Creates an empty tree of [`DEFAULT_MIN_DEGREE`]
    pub fn new() -> Self {
        Self::with_min_degree(DEFAULT_MIN_DEGREE)
    }

    /// Creates an empty tree of minimum degree `t`.
    ///
    /// `t` is clamped to [2, [`MAX_MIN_DEGREE`]].
    pub fn with_min_degree(t: usize) -> Self {
        Self {
            root: BNode::new(true),
            min_degree: t.clamp(2, MAX_MIN_DEGREE),
            len: 0,
        }
    }

    /// Minimum degree `t`
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }

    /// Insert or overwrite `key`.
    ///
    /// Returns true if the key was not present before.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if let Some(slot) = self.root.search_mut(key) {
            *slot = value;
            return false;
        }

        if self.root.keys.len() == self.max_keys() {
            let old_root = mem::replace(&mut self.root, BNode::new(false));
            self.root.children.push(old_root);
            self.root.split_child(0, self.min_degree);
        }

        self.root.insert_non_full(key, value, self.min_degree);
        self.len += 1;
        true
    }

    /// Point lookup
    pub fn search(&self, key: &str) -> Option<&str> {
        let mut node = &self.root;
        loop {
            let idx = node.find_key(key);
            if idx < node.keys.len() && node.keys[idx] == key {
                return Some(&node.values[idx]);
            }
            if node.leaf {
                return None;
            }
            node = &node.children[idx];
        }
    }

    /// All entries with `lo <= key <= hi`.
    pub fn search_range(&self, lo: &str, hi: &str) -> RangeEntries {
        let mut out = RangeEntries::new();
        self.root.search_range(lo, hi, &mut out);
        out
    }

    /// Remove `key`. An absent key leaves the tree untouched and returns false.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.search(key).is_none() {
            return false;
        }

        self.root.remove(key, self.min_degree);

        if self.root.keys.is_empty() && !self.root.leaf {
            let child = self.root.children.remove(0);
            self.root = child;
        }

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

    /// Number of levels (1 for a lone root)
    pub fn height(&self) -> usize {
        let mut levels = 1;
        let mut node = &self.root;
        while !node.leaf {
            node = &node.children[0];
            levels += 1;
        }
        levels
    }

    /// In-order snapshot of every entry
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_in_order(&mut out);
        out
    }

    /// Verify key counts, key ordering, child counts and leaf depth.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut leaf_depth = None;
        let mut count = 0;
        self.verify(&self.root, true, None, None, 0, &mut leaf_depth, &mut count)?;
        if count != self.len {
            return Err(format!("len is {} but tree holds {}", self.len, count));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn verify(
        &self,
        node: &BNode,
        is_root: bool,
        lower: Option<&str>,
        upper: Option<&str>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        count: &mut usize,
    ) -> Result<(), String> {
        let n = node.keys.len();
        let t = self.min_degree;

        if n > 2 * t - 1 {
            return Err(format!("node at depth {} holds {} keys", depth, n));
        }
        if !is_root && n < t - 1 {
            return Err(format!("node at depth {} holds only {} keys", depth, n));
        }
        if node.values.len() != n {
            return Err(format!("node at depth {} has mismatched values", depth));
        }
        if node.keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!("keys at depth {} are not strictly increasing", depth));
        }
        if let (Some(lo), Some(first)) = (lower, node.keys.first()) {
            if first.as_str() <= lo {
                return Err(format!("key {:?} violates its lower separator", first));
            }
        }
        if let (Some(hi), Some(last)) = (upper, node.keys.last()) {
            if last.as_str() >= hi {
                return Err(format!("key {:?} violates its upper separator", last));
            }
        }
        *count += n;

        if node.leaf {
            if !node.children.is_empty() {
                return Err(format!("leaf at depth {} has children", depth));
            }
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(d) if d != depth => {
                    return Err(format!("leaves at depths {} and {}", d, depth));
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.children.len() != n + 1 {
            return Err(format!(
                "internal node at depth {} has {} keys and {} children",
                depth,
                n,
                node.children.len()
            ));
        }

        for (i, child) in node.children.iter().enumerate() {
            let lo = if i == 0 { lower } else { Some(node.keys[i - 1].as_str()) };
            let hi = if i == n { upper } else { Some(node.keys[i].as_str()) };
            self.verify(child, false, lo, hi, depth + 1, leaf_depth, count)?;
        }
        Ok(())
    }
}
