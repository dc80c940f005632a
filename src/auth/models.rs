//! User model

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{password, validate};
use crate::error::{Error, Result};

/// A persisted user row
#[derive(Debug, Clone)]
pub struct User {
    /// Surrogate identifier generated by the store
    pub id: i32,
    pub username: String,
    pub email: String,
    /// bcrypt hash; never holds plaintext
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// A validated, hashed user ready to persist.
///
/// `NewUser::create` is the only way to build one, so a row can never be
/// inserted with an unhashed or unvalidated password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Validate the fields and hash the password
    pub fn create(username: &str, email: &str, plaintext: &str) -> Result<Self> {
        validate::registration(username, email, plaintext)
            .map_err(|errors| Error::Validation(errors.into_iter().map(|e| e.message).collect()))?;

        Ok(Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password::hash(plaintext)?,
        })
    }
}

/// The subset of a user exposed to templates
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
