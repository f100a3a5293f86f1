//! # User Management
//!
//! User model and repository for authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crypto::{hash_password, validate_password, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};
use super::roles::Role;

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    
    /// Login name (unique)
    pub username: String,
    
    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,
    
    pub role: Role,
    
    /// When the user was registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, hashing the password after checking the policy
    pub fn new(
        username: impl Into<String>,
        password: &str,
        role: Role,
        policy: &PasswordPolicy,
    ) -> AuthResult<Self> {
        let username = username.into();
        if username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        validate_password(password, policy)?;
        let password_hash = hash_password(password)?;
        
        Ok(Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
            created_at: Utc::now(),
        })
    }
    
    /// Verify a password against this user's stored hash
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        verify_password(password, &self.password_hash)
    }
}

/// User repository trait
/// 
/// Abstracts storage operations for users.
pub trait UserRepository: Send + Sync {
    /// Find a user by name
    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;
    
    /// Check if a username is already registered
    fn username_exists(&self, username: &str) -> AuthResult<bool>;
    
    /// Store a new user; fails with `UserAlreadyExists` on a taken name
    fn create(&self, user: &User) -> AuthResult<()>;
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: std::sync::RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().map_err(|_| {
            AuthError::StorageError("lock poisoned".to_string())
        })?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
    
    fn username_exists(&self, username: &str) -> AuthResult<bool> {
        let users = self.users.read().map_err(|_| {
            AuthError::StorageError("lock poisoned".to_string())
        })?;
        Ok(users.iter().any(|u| u.username == username))
    }
    
    fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().map_err(|_| {
            AuthError::StorageError("lock poisoned".to_string())
        })?;
        
        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::UserAlreadyExists);
        }
        
        users.push(user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    fn default_policy() -> PasswordPolicy {
        PasswordPolicy::default()
    }
    
    #[test]
    fn test_user_creation() {
        let user = User::new("alice", "password123", Role::Editor, &default_policy()).unwrap();
        
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Editor);
        assert_ne!(user.password_hash, "password123");
        assert!(user.verify_password("password123").unwrap());
        assert!(!user.verify_password("password124").unwrap());
    }
    
    #[test]
    fn test_empty_username_rejected() {
        let result = User::new("", "password123", Role::User, &default_policy());
        assert!(matches!(result, Err(AuthError::EmptyUsername)));
    }
    
    #[test]
    fn test_weak_password_rejected() {
        let policy = PasswordPolicy::with_min_length(10);
        let result = User::new("alice", "short", Role::User, &policy);
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }
    
    #[test]
    fn test_in_memory_repository() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice", "password123", Role::User, &default_policy()).unwrap();
        repo.create(&user).unwrap();
        
        let found = repo.find_by_username("alice").unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(repo.username_exists("alice").unwrap());
        assert!(!repo.username_exists("bob").unwrap());
        
        // Duplicate name rejected
        let again = User::new("alice", "password456", Role::Admin, &default_policy()).unwrap();
        assert_eq!(repo.create(&again), Err(AuthError::UserAlreadyExists));
    }
    
    #[test]
    fn test_user_serialization_omits_password() {
        let user = User::new("alice", "password123", Role::User, &default_policy()).unwrap();
        let json = serde_json::to_string(&user).unwrap();
        
        assert!(!json.contains("password_hash"));
        assert!(!json.contains(&user.password_hash));
        assert!(json.contains("\"role\":\"user\""));
    }
}
