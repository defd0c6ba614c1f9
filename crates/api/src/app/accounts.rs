//! Mock credential store backing the sign-in and register routes.
//!
//! Accounts live in memory for the life of the process; nothing is hashed,
//! persisted or turned into a session.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("account store unavailable")]
    Unavailable,
}

#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: RwLock<HashMap<String, String>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let mut accounts = self.accounts.write().map_err(|_| AuthError::Unavailable)?;
        if accounts.contains_key(username) {
            return Err(AuthError::UsernameTaken);
        }
        accounts.insert(username.to_string(), password.to_string());
        Ok(())
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let accounts = self.accounts.read().map_err(|_| AuthError::Unavailable)?;
        match accounts.get(username) {
            Some(stored) if stored == password => Ok(()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
