//! Red-black tree
//!
//! Nodes live in an arena and refer to each other by index. Index 0 is the
//! shared sentinel: it is black, never holds a real key, and stands in for
//! every absent child and for the root's parent. Parent links are plain
//! indices, so there is no ownership cycle between parents and children.
//!
//! Slots of deleted nodes go onto a free list and are reused by later
//! inserts; the sentinel slot is never freed.

use std::cmp::Ordering;
use std::mem;

use super::RangeEntries;

/// Index of the sentinel node
const NIL: usize = 0;

/// Node color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Debug)]
struct RbNode {
    key: String,
    value: String,
    color: Color,
    left: usize,
    right: usize,
    parent: usize,
}

impl RbNode {
    fn sentinel() -> Self {
        Self {
            key: String::new(),
            value: String::new(),
            color: Color::Black,
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }
}

/// Red-black tree keyed by strings.
#[derive(Debug)]
pub struct RedBlackTree {
    nodes: Vec<RbNode>,
    root: usize,
    free: Vec<usize>,
    len: usize,
}

impl Default for RedBlackTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RedBlackTree {
    /// Creates an empty tree holding only the sentinel
    pub fn new() -> Self {
        Self {
            nodes: vec![RbNode::sentinel()],
            root: NIL,
            free: Vec::new(),
            len: 0,
        }
    }

    fn alloc(&mut self, key: &str, value: String, parent: usize) -> usize {
        let node = RbNode {
            key: key.to_string(),
            value,
            color: Color::Red,
            left: NIL,
            right: NIL,
            parent,
        };

        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) {
        let node = &mut self.nodes[idx];
        mem::take(&mut node.key);
        mem::take(&mut node.value);
        node.color = Color::Black;
        node.left = NIL;
        node.right = NIL;
        node.parent = NIL;
        self.free.push(idx);
    }

    fn color(&self, x: usize) -> Color {
        self.nodes[x].color
    }

    fn set_color(&mut self, x: usize, color: Color) {
        self.nodes[x].color = color;
    }

    fn parent(&self, x: usize) -> usize {
        self.nodes[x].parent
    }

    fn left(&self, x: usize) -> usize {
        self.nodes[x].left
    }

    fn right(&self, x: usize) -> usize {
        self.nodes[x].right
    }

    /// Point `u`'s parent at `v` in place of `u`.
    fn replace_child(&mut self, u: usize, v: usize) {
        let up = self.parent(u);
        if up == NIL {
            self.root = v;
        } else if u == self.left(up) {
            self.nodes[up].left = v;
        } else {
            self.nodes[up].right = v;
        }
    }

    fn left_rotate(&mut self, x: usize) {
        let y = self.right(x);
        let y_left = self.left(y);

        self.nodes[x].right = y_left;
        if y_left != NIL {
            self.nodes[y_left].parent = x;
        }

        self.nodes[y].parent = self.parent(x);
        self.replace_child(x, y);

        self.nodes[y].left = x;
        self.nodes[x].parent = y;
    }

    fn right_rotate(&mut self, y: usize) {
        let x = self.left(y);
        let x_right = self.right(x);

        self.nodes[y].left = x_right;
        if x_right != NIL {
            self.nodes[x_right].parent = y;
        }

        self.nodes[x].parent = self.parent(y);
        self.replace_child(y, x);

        self.nodes[x].right = y;
        self.nodes[y].parent = x;
    }

    fn find(&self, key: &str) -> usize {
        let mut x = self.root;
        while x != NIL {
            x = match key.cmp(self.nodes[x].key.as_str()) {
                Ordering::Less => self.left(x),
                Ordering::Greater => self.right(x),
                Ordering::Equal => return x,
            };
        }
        NIL
    }

    fn minimum(&self, mut x: usize) -> usize {
        while self.left(x) != NIL {
            x = self.left(x);
        }
        x
    }

    /// Insert or overwrite `key`.
    ///
    /// Overwrites never restructure. Returns true if the key is new.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let mut parent = NIL;
        let mut x = self.root;

        while x != NIL {
            parent = x;
            x = match key.cmp(self.nodes[x].key.as_str()) {
                Ordering::Less => self.left(x),
                Ordering::Greater => self.right(x),
                Ordering::Equal => {
                    self.nodes[x].value = value;
                    return false;
                }
            };
        }

        let z = self.alloc(key, value, parent);
        if parent == NIL {
            self.root = z;
        } else if key < self.nodes[parent].key.as_str() {
            self.nodes[parent].left = z;
        } else {
            self.nodes[parent].right = z;
        }

        self.insert_fixup(z);
        self.len += 1;
        true
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while self.color(self.parent(z)) == Color::Red {
            let p = self.parent(z);
            let g = self.parent(p);

            if p == self.left(g) {
                let uncle = self.right(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(p) {
                        z = p;
                        self.left_rotate(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.right_rotate(g);
                }
            } else {
                let uncle = self.left(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.right_rotate(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.left_rotate(g);
                }
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Point lookup
    pub fn search(&self, key: &str) -> Option<&str> {
        match self.find(key) {
            NIL => None,
            x => Some(&self.nodes[x].value),
        }
    }

    /// All entries with `lo <= key <= hi`.
    pub fn search_range(&self, lo: &str, hi: &str) -> RangeEntries {
        let mut out = RangeEntries::new();
        self.collect_range(self.root, lo, hi, &mut out);
        out
    }

    fn collect_range(&self, x: usize, lo: &str, hi: &str, out: &mut RangeEntries) {
        if x == NIL {
            return;
        }
        let node = &self.nodes[x];

        if lo < node.key.as_str() {
            self.collect_range(node.left, lo, hi, out);
        }

        if lo <= node.key.as_str() && node.key.as_str() <= hi {
            out.insert(node.key.clone(), node.value.clone());
        }

        if hi > node.key.as_str() {
            self.collect_range(node.right, lo, hi, out);
        }
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v`.
    ///
    /// `v` may be the sentinel; its parent link is still written so the
    /// delete fixup can climb from it.
    fn transplant(&mut self, u: usize, v: usize) {
        self.replace_child(u, v);
        self.nodes[v].parent = self.parent(u);
    }

    /// Remove `key`. An absent key leaves the tree untouched and returns false.
    pub fn delete(&mut self, key: &str) -> bool {
        let z = self.find(key);
        if z == NIL {
            return false;
        }

        let mut removed_color = self.color(z);
        let x;

        if self.left(z) == NIL {
            x = self.right(z);
            self.transplant(z, x);
        } else if self.right(z) == NIL {
            x = self.left(z);
            self.transplant(z, x);
        } else {
            let y = self.minimum(self.right(z));
            removed_color = self.color(y);
            x = self.right(y);

            if self.parent(y) == z {
                self.nodes[x].parent = y;
            } else {
                self.transplant(y, x);
                let z_right = self.right(z);
                self.nodes[y].right = z_right;
                self.nodes[z_right].parent = y;
            }

            self.transplant(z, y);
            let z_left = self.left(z);
            self.nodes[y].left = z_left;
            self.nodes[z_left].parent = y;
            self.set_color(y, self.color(z));
        }

        if removed_color == Color::Black {
            self.delete_fixup(x);
        }

        self.release(z);
        self.nodes[NIL].parent = NIL;
        self.len -= 1;
        true
    }

    fn delete_fixup(&mut self, mut x: usize) {
        while x != self.root && self.color(x) == Color::Black {
            let p = self.parent(x);

            if x == self.left(p) {
                let mut w = self.right(p);
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.left_rotate(p);
                    w = self.right(self.parent(x));
                }

                if self.color(self.left(w)) == Color::Black && self.color(self.right(w)) == Color::Black {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color(self.right(w)) == Color::Black {
                        let near = self.left(w);
                        self.set_color(near, Color::Black);
                        self.set_color(w, Color::Red);
                        self.right_rotate(w);
                        w = self.right(self.parent(x));
                    }
                    let p = self.parent(x);
                    self.set_color(w, self.color(p));
                    self.set_color(p, Color::Black);
                    let far = self.right(w);
                    self.set_color(far, Color::Black);
                    self.left_rotate(p);
                    x = self.root;
                }
            } else {
                let mut w = self.left(p);
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.right_rotate(p);
                    w = self.left(self.parent(x));
                }

                if self.color(self.right(w)) == Color::Black && self.color(self.left(w)) == Color::Black {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color(self.left(w)) == Color::Black {
                        let near = self.right(w);
                        self.set_color(near, Color::Black);
                        self.set_color(w, Color::Red);
                        self.left_rotate(w);
                        w = self.left(self.parent(x));
                    }
                    let p = self.parent(x);
                    self.set_color(w, self.color(p));
                    self.set_color(p, Color::Black);
                    let far = self.left(w);
                    self.set_color(far, Color::Black);
                    self.right_rotate(p);
                    x = self.root;
                }
            }
        }

        self.set_color(x, Color::Black);
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Key stored at the root, if any
    pub fn root_key(&self) -> Option<&str> {
        match self.root {
            NIL => None,
            x => Some(&self.nodes[x].key),
        }
    }

    /// Color of the node holding `key`
    pub fn color_of(&self, key: &str) -> Option<Color> {
        match self.find(key) {
            NIL => None,
            x => Some(self.color(x)),
        }
    }

    /// In-order snapshot of every entry
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_in_order(self.root, &mut out);
        out
    }

    fn collect_in_order(&self, x: usize, out: &mut Vec<(String, String)>) {
        if x == NIL {
            return;
        }
        let node = &self.nodes[x];
        self.collect_in_order(node.left, out);
        out.push((node.key.clone(), node.value.clone()));
        self.collect_in_order(node.right, out);
    }

    /// Verify ordering, parent links and the red-black coloring rules.
    pub fn check_invariants(&self) -> Result<(), String> {
        let sentinel = &self.nodes[NIL];
        if sentinel.color != Color::Black || !sentinel.key.is_empty() {
            return Err("sentinel is not a black empty node".to_string());
        }
        if self.color(self.root) != Color::Black {
            return Err("root is red".to_string());
        }
        if self.root != NIL && self.parent(self.root) != NIL {
            return Err("root has a parent".to_string());
        }

        let mut count = 0;
        self.verify(self.root, None, None, &mut count)?;
        if count != self.len {
            return Err(format!("len is {} but tree holds {}", self.len, count));
        }
        Ok(())
    }

    /// Returns the black-height of the subtree rooted at `x`.
    fn verify(
        &self,
        x: usize,
        lower: Option<&str>,
        upper: Option<&str>,
        count: &mut usize,
    ) -> Result<usize, String> {
        if x == NIL {
            return Ok(1);
        }
        *count += 1;
        let node = &self.nodes[x];

        if lower.map_or(false, |lo| node.key.as_str() <= lo)
            || upper.map_or(false, |hi| node.key.as_str() >= hi)
        {
            return Err(format!("key {:?} is out of order", node.key));
        }

        for child in [node.left, node.right] {
            if child == NIL {
                continue;
            }
            if self.parent(child) != x {
                return Err(format!("child of {:?} has a stale parent link", node.key));
            }
            if node.color == Color::Red && self.color(child) == Color::Red {
                return Err(format!("red node {:?} has a red child", node.key));
            }
        }

        let left = self.verify(node.left, lower, Some(node.key.as_str()), count)?;
        let right = self.verify(node.right, Some(node.key.as_str()), upper, count)?;
        if left != right {
            return Err(format!(
                "black-height differs under {:?} ({} vs {})",
                node.key, left, right
            ));
        }

        Ok(left + usize::from(node.color == Color::Black))
    }
}
