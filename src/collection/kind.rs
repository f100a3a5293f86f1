//! Tree kind selector

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{CollectionError, CollectionResult};

/// Which ordered tree backs a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    Avl,
    RedBlack,
    BTree,
}

impl TreeKind {
    /// All supported kinds
    pub const ALL: [TreeKind; 3] = [TreeKind::Avl, TreeKind::RedBlack, TreeKind::BTree];

    /// Wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeKind::Avl => "avl",
            TreeKind::RedBlack => "redblack",
            TreeKind::BTree => "btree",
        }
    }

    /// Parse a wire name; anything else is an unknown tree type.
    pub fn parse(name: &str) -> CollectionResult<Self> {
        match name {
            "avl" => Ok(TreeKind::Avl),
            "redblack" => Ok(TreeKind::RedBlack),
            "btree" => Ok(TreeKind::BTree),
            other => Err(CollectionError::unknown_tree_type(other)),
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
