//! Concurrent namespace: pools hold schemas, schemas hold collections
//!
//! Names are unique per parent and restricted to letters, digits, `_`
//! and `-`. Entities are never removed once created. Every create is
//! authorized through a [`PermissionGate`] before any lock is taken.

mod database;
mod errors;
mod names;
mod permission;

pub use database::{Database, Pool, Schema};
pub use errors::{NamespaceError, NamespaceErrorCode, NamespaceResult};
pub use names::validate_name;
pub use permission::{Permission, PermissionGate};
