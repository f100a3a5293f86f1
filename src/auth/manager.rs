//! # Auth Manager
//!
//! Registration, credential checks and permission lookups over a
//! [`UserRepository`].

use std::sync::Arc;

use crate::namespace::{Permission, PermissionGate};

use super::crypto::PasswordPolicy;
use super::errors::{AuthError, AuthResult};
use super::roles::Role;
use super::user::{InMemoryUserRepository, User, UserRepository};

/// Auth service backing the command handler and the namespace gate
pub struct AuthManager<U: UserRepository = InMemoryUserRepository> {
    user_repo: Arc<U>,
    password_policy: PasswordPolicy,
}

impl AuthManager<InMemoryUserRepository> {
    /// Manager over a fresh in-memory repository
    pub fn in_memory(password_policy: PasswordPolicy) -> Self {
        Self::new(InMemoryUserRepository::new(), password_policy)
    }
}

impl<U: UserRepository> AuthManager<U> {
    pub fn new(user_repo: U, password_policy: PasswordPolicy) -> Self {
        Self {
            user_repo: Arc::new(user_repo),
            password_policy,
        }
    }

    /// Register a new user under `role`
    pub fn register_user(&self, username: &str, password: &str, role: Role) -> AuthResult<()> {
        if self.user_repo.username_exists(username)? {
            return Err(AuthError::UserAlreadyExists);
        }
        
        let user = User::new(username, password, role, &self.password_policy)?;
        self.user_repo.create(&user)
    }

    /// Check credentials and return the user's role
    pub fn validate_user(&self, username: &str, password: &str) -> AuthResult<Role> {
        let user = self
            .user_repo
            .find_by_username(username)?
            .ok_or(AuthError::UserNotFound)?;
        
        if !user.verify_password(password)? {
            return Err(AuthError::InvalidPassword);
        }
        
        Ok(user.role)
    }

    /// Role of a registered user
    pub fn role_of(&self, username: &str) -> AuthResult<Role> {
        self.user_repo
            .find_by_username(username)?
            .map(|user| user.role)
            .ok_or(AuthError::UserNotFound)
    }
}

impl<U: UserRepository> PermissionGate for AuthManager<U> {
    /// False for unknown users and for repository failures
    fn has_permission(&self, username: &str, permission: Permission) -> bool {
        self.role_of(username)
            .map(|role| role.grants(permission))
            .unwrap_or(false)
    }
}
