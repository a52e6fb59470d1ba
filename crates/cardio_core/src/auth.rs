//! Credential store collaborator.
//!
//! Register/login/logout/current-user over the JSON substrate. The
//! password obfuscation here is a reversible placeholder for a local
//! single-user research tool, not a password hash. Credential material is
//! stripped before a `User` is handed back to callers.

use crate::error::AuthError;
use crate::storage::{JsonStore, SESSION_KEY, USERS_KEY};
use crate::types::{Gender, User};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Internal credential record; never leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    id: Uuid,
    username: String,
    secret: String,
    age: Option<u32>,
    gender: Option<Gender>,
}

impl StoredUser {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            age: self.age,
            gender: self.gender,
        }
    }
}

/// JSON-file-backed credential store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    store: JsonStore,
}

impl CredentialStore {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Register a new user and log them in.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        age: u32,
        gender: Gender,
    ) -> Result<User, AuthError> {
        let mut users: Vec<StoredUser> = self.store.load(USERS_KEY)?;

        if users.iter().any(|u| u.username == username) {
            return Err(AuthError::UsernameTaken);
        }

        let stored = StoredUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            secret: obfuscate(password),
            age: Some(age),
            gender: Some(gender),
        };
        users.push(stored);
        self.store.save(USERS_KEY, &users)?;

        info!("registered user {}", username);
        self.login(username, password)
    }

    /// Log in with a case-sensitive username and password.
    pub fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let users: Vec<StoredUser> = self.store.load(USERS_KEY)?;
        let secret = obfuscate(password);

        let stored = users
            .iter()
            .find(|u| u.username == username && u.secret == secret)
            .ok_or(AuthError::InvalidCredentials)?;

        let user = stored.to_user();
        self.store.save(SESSION_KEY, &user)?;
        info!("user {} logged in", username);
        Ok(user)
    }

    /// Clear the current session.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(SESSION_KEY)?;
        Ok(())
    }

    /// The currently logged-in user, if any.
    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        let session: Option<User> = self.store.load(SESSION_KEY)?;
        Ok(session)
    }
}

/// Reversible obfuscation placeholder (hex encode, then reverse).
fn obfuscate(password: &str) -> String {
    hex::encode(password.as_bytes()).chars().rev().collect()
}
