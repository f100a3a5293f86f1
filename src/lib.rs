//! arbordb - an in-memory key-value core over interchangeable ordered trees
//!
//! Pools hold schemas, schemas hold collections, and every collection is
//! backed by an AVL tree, a red-black tree or a B-tree chosen at creation.

pub mod api;
pub mod auth;
pub mod cli;
pub mod collection;
pub mod namespace;
pub mod observability;
pub mod server;
pub mod tree;
