//! API layer for arbordb
//!
//! Decodes one JSON command, authenticates it, dispatches it against the
//! namespace and encodes one JSON response.
//!
//! # Supported Operations
//!
//! - register
//! - create_pool, create_schema, create_collection
//! - set, update, get, get_range, delete
//! - list_pools, list_schemas, list_collections

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult};
pub use handler::CommandHandler;
pub use request::{Command, Operation};
pub use response::{ErrorResponse, Response, SuccessResponse};
