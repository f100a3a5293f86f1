//! Permission tags and the gate the namespace consults

use std::fmt;

use serde::{Deserialize, Serialize};

/// Capability a role may grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CreatePool,
    DeletePool,
    CreateSchema,
    DeleteSchema,
    CreateCollection,
    DeleteCollection,
    Read,
    Write,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::CreatePool,
        Permission::DeletePool,
        Permission::CreateSchema,
        Permission::DeleteSchema,
        Permission::CreateCollection,
        Permission::DeleteCollection,
        Permission::Read,
        Permission::Write,
    ];

    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreatePool => "create_pool",
            Permission::DeletePool => "delete_pool",
            Permission::CreateSchema => "create_schema",
            Permission::DeleteSchema => "delete_schema",
            Permission::CreateCollection => "create_collection",
            Permission::DeleteCollection => "delete_collection",
            Permission::Read => "read",
            Permission::Write => "write",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authorization check consulted before namespace and data operations.
///
/// Unknown users hold no permissions.
pub trait PermissionGate: Send + Sync {
    fn has_permission(&self, username: &str, permission: Permission) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_serde_names() {
        for permission in Permission::ALL {
            let json = serde_json::to_string(&permission).unwrap();
            assert_eq!(json, format!("\"{}\"", permission.as_str()));
        }
    }
}
