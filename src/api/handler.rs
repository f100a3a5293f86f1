//! Command handler for arbordb
//!
//! Request flow:
//! 1. Authenticate (every operation except `register`)
//! 2. Resolve the operation
//! 3. Authorize data operations against the permission gate
//! 4. Resolve the collection path
//! 5. Run the collection operation and build the payload

use std::sync::Arc;

use serde_json::{json, Value};

use crate::auth::{AuthManager, Role};
use crate::collection::{Collection, CollectionResult, Status};
use crate::namespace::{Database, Permission};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

use super::errors::{ApiError, ApiResult};
use super::request::{Command, Operation};
use super::response::Response;

/// Dispatches decoded commands against one database
pub struct CommandHandler {
    database: Arc<Database>,
    auth: Arc<AuthManager>,
    metrics: Arc<MetricsRegistry>,
}

impl CommandHandler {
    /// Create a handler; `database` should use `auth` as its permission gate
    pub fn new(database: Arc<Database>, auth: Arc<AuthManager>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            database,
            auth,
            metrics,
        }
    }

    /// Handler over a fresh database gated by `auth`
    pub fn with_auth(auth: Arc<AuthManager>, btree_min_degree: usize) -> Self {
        let database = Database::with_btree_degree(auth.clone(), btree_min_degree);
        Self::new(Arc::new(database), auth, Arc::new(MetricsRegistry::new()))
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Handle one raw JSON request line
    ///
    /// A line that does not decode yields an error response; whether the
    /// connection survives is the caller's decision.
    pub fn handle_json(&self, line: &str) -> Response {
        match Command::parse(line) {
            Ok(command) => self.handle(&command),
            Err(e) => Response::error(&e),
        }
    }

    /// Handle a decoded command
    pub fn handle(&self, command: &Command) -> Response {
        match self.execute(command) {
            Ok(payload) => {
                self.metrics.increment_commands_executed();
                log_event_with_fields(
                    Event::CommandExecuted,
                    &[
                        ("operation", command.operation.as_str()),
                        ("username", command.username.as_str()),
                    ],
                );
                Response::success(payload)
            }
            Err(e) => {
                self.metrics.increment_commands_rejected();
                log_event_with_fields(
                    Event::CommandRejected,
                    &[
                        ("code", e.code()),
                        ("operation", command.operation.as_str()),
                        ("username", command.username.as_str()),
                    ],
                );
                Response::error(&e)
            }
        }
    }

    fn execute(&self, command: &Command) -> ApiResult<Value> {
        if command.operation != Operation::Register.as_str() {
            self.authenticate(command)?;
        }

        match Operation::parse(&command.operation)? {
            Operation::Register => self.register(command),
            Operation::CreatePool => {
                self.database
                    .create_pool(&command.username, &command.pool)?;
                self.created(Event::PoolCreated, &[("pool", command.pool.as_str())]);
                Ok(Value::Null)
            }
            Operation::CreateSchema => {
                self.database
                    .create_schema(&command.username, &command.pool, &command.schema)?;
                self.created(
                    Event::SchemaCreated,
                    &[("pool", command.pool.as_str()), ("schema", command.schema.as_str())],
                );
                Ok(Value::Null)
            }
            Operation::CreateCollection => {
                self.database.create_collection_with_degree(
                    &command.username,
                    &command.pool,
                    &command.schema,
                    &command.collection,
                    &command.tree_type,
                    command.min_degree,
                )?;
                self.created(
                    Event::CollectionCreated,
                    &[
                        ("collection", command.collection.as_str()),
                        ("pool", command.pool.as_str()),
                        ("schema", command.schema.as_str()),
                        ("tree_type", command.tree_type.as_str()),
                    ],
                );
                Ok(Value::Null)
            }
            Operation::Set => {
                let collection = self.collection(command, Permission::Write)?;
                collection.set(&command.key, &command.secondary_key, &command.value)?;
                Ok(json!(Status::Ok))
            }
            Operation::Update => {
                let collection = self.collection(command, Permission::Write)?;
                collection.update(&command.key, &command.value)?;
                Ok(json!(Status::Ok))
            }
            Operation::Get => {
                let collection = self.collection(command, Permission::Read)?;
                let result = collection.get(&command.key);
                let status = in_band(&result)?;
                Ok(json!({
                    "value": result.unwrap_or_default(),
                    "status": status,
                }))
            }
            Operation::GetRange => {
                let collection = self.collection(command, Permission::Read)?;
                let values = collection.get_range(&command.left_bound, &command.right_bound)?;
                Ok(json!({
                    "values": values,
                    "status": Status::Ok,
                }))
            }
            Operation::Delete => {
                let collection = self.collection(command, Permission::Write)?;
                let result = collection.delete(&command.key);
                Ok(json!(in_band(&result)?))
            }
            Operation::ListPools => {
                self.database.authorize(&command.username, Permission::Read)?;
                Ok(json!(self.database.list_pools()?))
            }
            Operation::ListSchemas => {
                self.database.authorize(&command.username, Permission::Read)?;
                Ok(json!(self.database.list_schemas(&command.pool)?))
            }
            Operation::ListCollections => {
                self.database.authorize(&command.username, Permission::Read)?;
                Ok(json!(self
                    .database
                    .list_collections(&command.pool, &command.schema)?))
            }
        }
    }

    fn authenticate(&self, command: &Command) -> ApiResult<Role> {
        self.auth
            .validate_user(&command.username, &command.password)
            .map_err(|e| {
                self.metrics.increment_auth_failures();
                log_event_with_fields(
                    Event::AuthenticationFailed,
                    &[("reason", e.code()), ("username", command.username.as_str())],
                );
                ApiError::authentication_failed(&e)
            })
    }

    fn register(&self, command: &Command) -> ApiResult<Value> {
        let role = match command.role.as_deref() {
            None | Some("") => Role::default(),
            Some(name) => name.parse::<Role>()?,
        };
        self.auth
            .register_user(&command.username, &command.password, role)?;
        self.metrics.increment_users();
        log_event_with_fields(
            Event::UserRegistered,
            &[("role", role.as_str()), ("username", command.username.as_str())],
        );
        Ok(Value::Null)
    }

    /// Authorize, then resolve the command's collection path
    fn collection(&self, command: &Command, permission: Permission) -> ApiResult<Arc<Collection>> {
        self.database.authorize(&command.username, permission)?;
        Ok(self
            .database
            .get_collection(&command.pool, &command.schema, &command.collection)?)
    }

    fn created(&self, event: Event, fields: &[(&str, &str)]) {
        self.metrics.increment_entities();
        log_event_with_fields(event, fields);
    }
}

/// Status of a collection result, or the error when it has none
fn in_band<T>(result: &CollectionResult<T>) -> ApiResult<Status> {
    match result {
        Ok(_) => Ok(Status::Ok),
        Err(e) => e
            .status()
            .ok_or_else(|| ApiError::from_collection_error(e.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordPolicy;

    const PASSWORD: &str = "password123";

    fn handler() -> CommandHandler {
        let auth = Arc::new(AuthManager::in_memory(PasswordPolicy::default()));
        CommandHandler::with_auth(auth, 3)
    }

    fn command(op: &str, user: &str) -> Command {
        Command::new(op, user, PASSWORD)
    }

    fn register(handler: &CommandHandler, user: &str, role: &str) {
        let mut cmd = command("register", user);
        cmd.role = Some(role.to_string());
        assert!(handler.handle(&cmd).is_success());
    }

    /// Registers "root" as superuser and creates p/s/c with the given tree type
    fn seeded(tree_type: &str) -> CommandHandler {
        let h = handler();
        register(&h, "root", "superuser");

        let mut cmd = command("create_pool", "root");
        cmd.pool = "p".to_string();
        assert!(h.handle(&cmd).is_success());

        cmd.operation = "create_schema".to_string();
        cmd.schema = "s".to_string();
        assert!(h.handle(&cmd).is_success());

        cmd.operation = "create_collection".to_string();
        cmd.collection = "c".to_string();
        cmd.tree_type = tree_type.to_string();
        assert!(h.handle(&cmd).is_success());
        h
    }

    fn data(op: &str, user: &str, key: &str, value: &str) -> Command {
        let mut cmd = command(op, user);
        cmd.pool = "p".to_string();
        cmd.schema = "s".to_string();
        cmd.collection = "c".to_string();
        cmd.key = key.to_string();
        cmd.value = value.to_string();
        cmd
    }

    #[test]
    fn test_set_then_get() {
        let h = seeded("avl");
        let resp = h.handle(&data("set", "root", "k", "v"));
        assert_eq!(resp.payload(), Some(&json!("ok")));

        let resp = h.handle(&data("get", "root", "k", ""));
        assert_eq!(resp.payload(), Some(&json!({"value": "v", "status": "ok"})));
    }

    #[test]
    fn test_get_missing_key_is_in_band() {
        let h = seeded("redblack");
        let resp = h.handle(&data("get", "root", "nope", ""));
        assert_eq!(
            resp.payload(),
            Some(&json!({"value": "", "status": "error: not found"}))
        );
    }

    #[test]
    fn test_delete_reports_status() {
        let h = seeded("btree");
        h.handle(&data("set", "root", "k", "v"));
        let first = h.handle(&data("delete", "root", "k", ""));
        assert_eq!(first.payload(), Some(&json!("ok")));
        let second = h.handle(&data("delete", "root", "k", ""));
        assert_eq!(second.payload(), Some(&json!("error: not found")));
    }

    #[test]
    fn test_get_range() {
        let h = seeded("btree");
        for k in ["1", "3", "5", "7", "9"] {
            h.handle(&data("update", "root", k, k));
        }
        let mut cmd = data("get_range", "root", "", "");
        cmd.left_bound = "3".to_string();
        cmd.right_bound = "7".to_string();
        let resp = h.handle(&cmd);
        assert_eq!(
            resp.payload(),
            Some(&json!({"values": {"3": "3", "5": "5", "7": "7"}, "status": "ok"}))
        );
    }

    #[test]
    fn test_authentication_failure() {
        let h = seeded("avl");
        let mut cmd = data("get", "root", "k", "");
        cmd.password = "wrong-password".to_string();
        let resp = h.handle(&cmd);
        assert_eq!(
            resp.error_message(),
            Some("authentication failed: invalid password")
        );
        assert_eq!(h.metrics().snapshot().auth_failures, 1);

        let resp = h.handle(&data("get", "ghost", "k", ""));
        assert_eq!(resp.error_message(), Some("authentication failed: user not found"));
    }

    #[test]
    fn test_authentication_precedes_operation_lookup() {
        let h = handler();
        let resp = h.handle(&command("explode", "ghost"));
        assert_eq!(resp.error_message(), Some("authentication failed: user not found"));

        register(&h, "alice", "user");
        let resp = h.handle(&command("explode", "alice"));
        assert_eq!(resp.error_message(), Some("unknown operation: explode"));
    }

    #[test]
    fn test_permissions_by_role() {
        let h = seeded("avl");
        register(&h, "viewer", "user");
        register(&h, "ed", "editor");

        let resp = h.handle(&data("set", "viewer", "k", "v"));
        assert_eq!(resp.error_message(), Some("permission denied"));

        assert!(h.handle(&data("set", "ed", "k", "v")).is_success());
        assert!(h.handle(&data("get", "viewer", "k", "")).is_success());

        let mut cmd = command("create_pool", "ed");
        cmd.pool = "other".to_string();
        assert_eq!(h.handle(&cmd).error_message(), Some("permission denied"));
    }

    #[test]
    fn test_register_defaults_and_duplicates() {
        let h = handler();
        assert!(h.handle(&command("register", "alice")).is_success());
        let resp = h.handle(&command("register", "alice"));
        assert_eq!(resp.error_message(), Some("user already exists"));

        let mut cmd = command("register", "bob");
        cmd.role = Some("overlord".to_string());
        assert_eq!(h.handle(&cmd).error_message(), Some("unknown role: overlord"));
    }

    #[test]
    fn test_path_errors() {
        let h = seeded("avl");
        let mut cmd = data("get", "root", "k", "");
        cmd.pool = "missing".to_string();
        assert_eq!(h.handle(&cmd).error_message(), Some("pool not found"));

        let mut cmd = data("get", "root", "k", "");
        cmd.collection = "missing".to_string();
        assert_eq!(h.handle(&cmd).error_message(), Some("collection not found"));
    }

    #[test]
    fn test_create_errors() {
        let h = seeded("avl");
        let mut cmd = command("create_pool", "root");
        cmd.pool = "p".to_string();
        assert_eq!(h.handle(&cmd).error_message(), Some("pool already exists"));

        cmd.pool = "bad pool".to_string();
        assert_eq!(
            h.handle(&cmd).error_message(),
            Some("name contains invalid characters")
        );

        let mut cmd = data("create_collection", "root", "", "");
        cmd.collection = "c2".to_string();
        cmd.tree_type = "splay".to_string();
        assert_eq!(h.handle(&cmd).error_message(), Some("unknown tree type"));
    }

    #[test]
    fn test_oversized_degree_is_rejected() {
        let h = seeded("btree");
        let resp = h.handle_json(
            r#"{"operation":"create_collection","username":"root","password":"password123",
                "pool":"p","schema":"s","collection":"huge","tree_type":"btree",
                "min_degree":9223372036854775808}"#,
        );
        assert_eq!(resp.error_message(), Some("invalid b-tree minimum degree"));

        // Nothing was created and existing collections keep working
        let mut cmd = data("set", "root", "k", "v");
        cmd.collection = "huge".to_string();
        assert_eq!(h.handle(&cmd).error_message(), Some("collection not found"));

        assert!(h.handle(&data("set", "root", "k", "v")).is_success());
        let resp = h.handle(&data("get", "root", "k", ""));
        assert_eq!(resp.payload(), Some(&json!({"value": "v", "status": "ok"})));
    }

    #[test]
    fn test_listings() {
        let h = seeded("avl");
        let resp = h.handle(&command("list_pools", "root"));
        assert_eq!(resp.payload(), Some(&json!(["p"])));

        let mut cmd = command("list_collections", "root");
        cmd.pool = "p".to_string();
        cmd.schema = "s".to_string();
        assert_eq!(h.handle(&cmd).payload(), Some(&json!(["c"])));
    }

    #[test]
    fn test_handle_json() {
        let h = handler();
        let resp = h.handle_json(r#"{"operation":"register","username":"a","password":"password123"}"#);
        assert_eq!(resp.to_json(), r#"{"status":"ok","response":null}"#);

        let resp = h.handle_json("not json");
        assert!(!resp.is_success());
    }

    #[test]
    fn test_metrics_follow_outcomes() {
        let h = seeded("avl");
        h.handle(&data("get", "root", "k", ""));
        let mut cmd = command("create_pool", "root");
        cmd.pool = "p".to_string();
        h.handle(&cmd);

        let snapshot = h.metrics().snapshot();
        assert_eq!(snapshot.users_registered, 1);
        assert_eq!(snapshot.entities_created, 3);
        assert_eq!(snapshot.commands_executed, 5);
        assert_eq!(snapshot.commands_rejected, 1);
    }
}
