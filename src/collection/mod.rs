//! Collections for arbordb
//!
//! A collection is the unit that stores key-value data. It wraps exactly one
//! ordered tree, chosen at creation time and never migrated.
//!
//! # Design Principles
//!
//! - Closed set of tree kinds, dispatched through an enum
//! - One reader-writer lock per collection: `get` and `get_range` share it,
//!   `set`, `update` and `delete` take it exclusively
//! - Failures are typed values; [`Status`] renders them for the wire
//!
//! # Supported Operations
//!
//! - set / update
//! - get
//! - get_range
//! - delete

#[allow(clippy::module_inception)]
mod collection;
mod errors;
mod kind;

pub use collection::{Collection, Status};
pub use errors::{CollectionError, CollectionErrorCode, CollectionResult};
pub use kind::TreeKind;
