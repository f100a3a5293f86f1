//! API request types
//!
//! One JSON object per request. Every field is optional on the wire;
//! absent string fields decode as empty strings. PascalCase field names
//! are accepted as aliases.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{ApiError, ApiResult};

/// Operation named by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    CreatePool,
    CreateSchema,
    CreateCollection,
    Set,
    Update,
    Get,
    GetRange,
    Delete,
    ListPools,
    ListSchemas,
    ListCollections,
}

impl Operation {
    /// Parse a wire operation name
    pub fn parse(name: &str) -> ApiResult<Self> {
        match name {
            "register" => Ok(Operation::Register),
            "create_pool" => Ok(Operation::CreatePool),
            "create_schema" => Ok(Operation::CreateSchema),
            "create_collection" => Ok(Operation::CreateCollection),
            "set" => Ok(Operation::Set),
            "update" => Ok(Operation::Update),
            "get" => Ok(Operation::Get),
            "get_range" => Ok(Operation::GetRange),
            "delete" => Ok(Operation::Delete),
            "list_pools" => Ok(Operation::ListPools),
            "list_schemas" => Ok(Operation::ListSchemas),
            "list_collections" => Ok(Operation::ListCollections),
            other => Err(ApiError::unknown_operation(other)),
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::CreatePool => "create_pool",
            Operation::CreateSchema => "create_schema",
            Operation::CreateCollection => "create_collection",
            Operation::Set => "set",
            Operation::Update => "update",
            Operation::Get => "get",
            Operation::GetRange => "get_range",
            Operation::Delete => "delete",
            Operation::ListPools => "list_pools",
            Operation::ListSchemas => "list_schemas",
            Operation::ListCollections => "list_collections",
        }
    }

    /// Whether the command must carry valid credentials
    pub fn requires_authentication(&self) -> bool {
        !matches!(self, Operation::Register)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decoded request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    #[serde(alias = "Operation")]
    pub operation: String,
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(alias = "Password", skip_serializing)]
    pub password: String,
    #[serde(alias = "Role", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(alias = "Pool")]
    pub pool: String,
    #[serde(alias = "Schema")]
    pub schema: String,
    #[serde(alias = "Collection")]
    pub collection: String,
    #[serde(alias = "TreeType")]
    pub tree_type: String,
    #[serde(alias = "Key")]
    pub key: String,
    #[serde(alias = "Value")]
    pub value: String,
    #[serde(alias = "SecondaryKey")]
    pub secondary_key: String,
    #[serde(alias = "LeftBound")]
    pub left_bound: String,
    #[serde(alias = "RightBound")]
    pub right_bound: String,
    #[serde(alias = "MinDegree", skip_serializing_if = "Option::is_none")]
    pub min_degree: Option<usize>,
}

impl Command {
    /// Parse a command from one JSON object
    pub fn parse(json: &str) -> ApiResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("invalid JSON: {}", e)))
    }

    /// Command for `operation` issued by `username`
    pub fn new(operation: impl Into<String>, username: &str, password: &str) -> Self {
        Self {
            operation: operation.into(),
            username: username.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }
}
