//! # Roles
//!
//! Fixed role → permission table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::namespace::Permission;

use super::errors::AuthError;

/// Role assigned to a user at registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    SuperUser,
    Admin,
    Editor,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperUser, Role::Admin, Role::Editor, Role::User];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperUser => "superuser",
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::User => "user",
        }
    }

    /// Permissions this role grants
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::SuperUser => &[
                CreatePool,
                DeletePool,
                CreateSchema,
                DeleteSchema,
                CreateCollection,
                DeleteCollection,
                Read,
                Write,
            ],
            Role::Admin => &[
                CreateSchema,
                DeleteSchema,
                CreateCollection,
                DeleteCollection,
                Read,
                Write,
            ],
            Role::Editor => &[CreateCollection, Read, Write],
            Role::User => &[Read],
        }
    }

    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthError::UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
