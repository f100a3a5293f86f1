//! # arbordb Auth Module
//!
//! User registration, credential validation and the role-based
//! permission gate consulted by the namespace.

pub mod crypto;
pub mod errors;
pub mod manager;
pub mod roles;
pub mod user;

pub use crypto::PasswordPolicy;
pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use roles::Role;
pub use user::{InMemoryUserRepository, User, UserRepository};
