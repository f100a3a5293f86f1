//! Database → Pool → Schema → Collection hierarchy
//!
//! Each level owns its child map behind its own lock. A cross-level
//! operation reads the parent's map, clones the child handle, and drops
//! the parent guard before touching the child. No two levels are ever
//! locked at once.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};

use crate::collection::{Collection, TreeKind};
use crate::tree::{DEFAULT_MIN_DEGREE, MAX_MIN_DEGREE};

use super::errors::{NamespaceError, NamespaceErrorCode, NamespaceResult};
use super::names::validate_name;
use super::permission::{Permission, PermissionGate};

type ChildMap<T> = RwLock<HashMap<String, Arc<T>>>;

fn lookup<T>(map: &ChildMap<T>, name: &str, missing: NamespaceErrorCode) -> NamespaceResult<Arc<T>> {
    let guard = map.read().map_err(|_| NamespaceError::lock_poisoned())?;
    guard
        .get(name)
        .cloned()
        .ok_or_else(|| NamespaceError::with_detail(missing, name))
}

fn insert_new<T>(
    map: &ChildMap<T>,
    name: &str,
    exists: NamespaceErrorCode,
    child: impl FnOnce() -> T,
) -> NamespaceResult<Arc<T>> {
    let mut guard = map.write().map_err(|_| NamespaceError::lock_poisoned())?;
    match guard.entry(name.to_string()) {
        Entry::Occupied(_) => Err(NamespaceError::with_detail(exists, name)),
        Entry::Vacant(slot) => Ok(Arc::clone(slot.insert(Arc::new(child())))),
    }
}

fn sorted_names<T>(map: &ChildMap<T>) -> NamespaceResult<Vec<String>> {
    let guard = map.read().map_err(|_| NamespaceError::lock_poisoned())?;
    let mut names: Vec<String> = guard.keys().cloned().collect();
    names.sort();
    Ok(names)
}

/// Named group of schemas
#[derive(Debug)]
pub struct Pool {
    name: String,
    schemas: ChildMap<Schema>,
}

impl Pool {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            schemas: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema by name
    pub fn schema(&self, name: &str) -> NamespaceResult<Arc<Schema>> {
        lookup(&self.schemas, name, NamespaceErrorCode::SchemaNotFound)
    }

    /// Schema names in ascending order
    pub fn schema_names(&self) -> NamespaceResult<Vec<String>> {
        sorted_names(&self.schemas)
    }
}

/// Named group of collections
#[derive(Debug)]
pub struct Schema {
    name: String,
    collections: ChildMap<Collection>,
}

impl Schema {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Collection by name
    pub fn collection(&self, name: &str) -> NamespaceResult<Arc<Collection>> {
        lookup(&self.collections, name, NamespaceErrorCode::CollectionNotFound)
    }

    /// Collection names in ascending order
    pub fn collection_names(&self) -> NamespaceResult<Vec<String>> {
        sorted_names(&self.collections)
    }
}

/// Root of the namespace.
///
/// Creates are authorized through the [`PermissionGate`]; lookups are not.
pub struct Database {
    pools: ChildMap<Pool>,
    gate: Arc<dyn PermissionGate>,
    btree_min_degree: usize,
}

impl Database {
    /// Empty database whose B-tree collections default to [`DEFAULT_MIN_DEGREE`]
    pub fn new(gate: Arc<dyn PermissionGate>) -> Self {
        Self::with_btree_degree(gate, DEFAULT_MIN_DEGREE)
    }

    /// Empty database with a custom default B-tree minimum degree
    pub fn with_btree_degree(gate: Arc<dyn PermissionGate>, btree_min_degree: usize) -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
            gate,
            btree_min_degree,
        }
    }

    /// Default minimum degree for new B-tree collections
    pub fn btree_min_degree(&self) -> usize {
        self.btree_min_degree
    }

    /// Fails with `PermissionDenied` unless `username` holds `permission`.
    pub fn authorize(&self, username: &str, permission: Permission) -> NamespaceResult<()> {
        if self.gate.has_permission(username, permission) {
            Ok(())
        } else {
            Err(NamespaceError::with_detail(
                NamespaceErrorCode::PermissionDenied,
                format!("{} lacks {}", username, permission),
            ))
        }
    }

    /// Create a pool. Requires `create_pool`.
    pub fn create_pool(&self, username: &str, pool: &str) -> NamespaceResult<()> {
        self.authorize(username, Permission::CreatePool)?;
        validate_name(pool)?;
        insert_new(&self.pools, pool, NamespaceErrorCode::PoolExists, || Pool::new(pool))?;
        Ok(())
    }

    /// Create a schema under an existing pool. Requires `create_schema`.
    pub fn create_schema(&self, username: &str, pool: &str, schema: &str) -> NamespaceResult<()> {
        self.authorize(username, Permission::CreateSchema)?;
        validate_name(schema)?;
        let parent = self.get_pool(pool)?;
        insert_new(&parent.schemas, schema, NamespaceErrorCode::SchemaExists, || {
            Schema::new(schema)
        })?;
        Ok(())
    }

    /// Create a collection under an existing schema using the default degree.
    ///
    /// Requires `create_collection`.
    pub fn create_collection(
        &self,
        username: &str,
        pool: &str,
        schema: &str,
        collection: &str,
        tree_type: &str,
    ) -> NamespaceResult<()> {
        self.create_collection_with_degree(username, pool, schema, collection, tree_type, None)
    }

    /// Create a collection, overriding the B-tree degree when `min_degree` is set.
    ///
    /// An override outside `2..=MAX_MIN_DEGREE` fails with `InvalidDegree`.
    pub fn create_collection_with_degree(
        &self,
        username: &str,
        pool: &str,
        schema: &str,
        collection: &str,
        tree_type: &str,
        min_degree: Option<usize>,
    ) -> NamespaceResult<()> {
        self.authorize(username, Permission::CreateCollection)?;
        validate_name(collection)?;
        let kind =
            TreeKind::parse(tree_type).map_err(|_| NamespaceError::unknown_tree_type(tree_type))?;
        let degree = match min_degree {
            Some(t) if !(2..=MAX_MIN_DEGREE).contains(&t) => {
                return Err(NamespaceError::invalid_degree(t));
            }
            Some(t) => t,
            None => self.btree_min_degree,
        };
        let parent = self.get_schema(pool, schema)?;
        insert_new(
            &parent.collections,
            collection,
            NamespaceErrorCode::CollectionExists,
            || Collection::with_btree_degree(kind, degree),
        )?;
        Ok(())
    }

    /// Pool by name
    pub fn get_pool(&self, pool: &str) -> NamespaceResult<Arc<Pool>> {
        lookup(&self.pools, pool, NamespaceErrorCode::PoolNotFound)
    }

    /// Schema by path
    pub fn get_schema(&self, pool: &str, schema: &str) -> NamespaceResult<Arc<Schema>> {
        self.get_pool(pool)?.schema(schema)
    }

    /// Collection by path
    pub fn get_collection(
        &self,
        pool: &str,
        schema: &str,
        collection: &str,
    ) -> NamespaceResult<Arc<Collection>> {
        self.get_schema(pool, schema)?.collection(collection)
    }

    /// Pool names in ascending order
    pub fn list_pools(&self) -> NamespaceResult<Vec<String>> {
        sorted_names(&self.pools)
    }

    /// Schema names of `pool` in ascending order
    pub fn list_schemas(&self, pool: &str) -> NamespaceResult<Vec<String>> {
        self.get_pool(pool)?.schema_names()
    }

    /// Collection names of `pool`/`schema` in ascending order
    pub fn list_collections(&self, pool: &str, schema: &str) -> NamespaceResult<Vec<String>> {
        self.get_schema(pool, schema)?.collection_names()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pools", &self.pools)
            .field("btree_min_degree", &self.btree_min_degree)
            .finish_non_exhaustive()
    }
}
