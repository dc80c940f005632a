//! Session table queries
//!
//! Sessions live in the same relational store as users. Expired rows are
//! dropped lazily on access; `purge_expired` exists for a periodic sweep.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::Result;

/// Session lifetime
const SESSION_TTL_HOURS: i64 = 24;

/// A session row
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: Option<i32>,
    pub errors: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

impl Database {
    /// Create a session row and return its id
    pub async fn create_session(&self, user_id: Option<i32>) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);

        self.client()
            .execute(
                "INSERT INTO sessions (id, user_id, errors, expires_at) VALUES ($1, $2, '[]', $3)",
                &[&id, &user_id, &expires_at],
            )
            .await?;

        tracing::debug!(session_id = %id, "Created session");
        Ok(id)
    }

    /// Fetch a session by id, dropping it if it has expired
    pub async fn get_session(&self, id: Uuid) -> Result<Option<SessionRecord>> {
        let row = self
            .client()
            .query_opt(
                "SELECT id, user_id, errors, expires_at FROM sessions WHERE id = $1",
                &[&id],
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row.get("expires_at");
        if expires_at < Utc::now() {
            self.delete_session(id).await?;
            return Ok(None);
        }

        let raw_errors: String = row.get("errors");
        Ok(Some(SessionRecord {
            id: row.get("id"),
            user_id: row.get("user_id"),
            errors: serde_json::from_str(&raw_errors).unwrap_or_default(),
            expires_at,
        }))
    }

    /// Attach an authenticated user to an existing session
    pub async fn set_session_user(&self, id: Uuid, user_id: i32) -> Result<()> {
        self.client()
            .execute(
                "UPDATE sessions SET user_id = $2 WHERE id = $1",
                &[&id, &user_id],
            )
            .await?;
        Ok(())
    }

    /// Store pending error messages on a session
    pub async fn set_session_errors(&self, id: Uuid, errors: &[String]) -> Result<()> {
        let encoded = serde_json::to_string(errors)?;
        self.client()
            .execute(
                "UPDATE sessions SET errors = $2 WHERE id = $1",
                &[&id, &encoded],
            )
            .await?;
        Ok(())
    }

    /// Clear pending error messages once they have been displayed
    pub async fn clear_session_errors(&self, id: Uuid) -> Result<()> {
        self.client()
            .execute("UPDATE sessions SET errors = '[]' WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }

    /// Destroy a session
    pub async fn delete_session(&self, id: Uuid) -> Result<()> {
        self.client()
            .execute("DELETE FROM sessions WHERE id = $1", &[&id])
            .await?;
        tracing::debug!(session_id = %id, "Deleted session");
        Ok(())
    }

    /// Remove expired session rows; returns how many were dropped
    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        let purged = self
            .client()
            .execute("DELETE FROM sessions WHERE expires_at < now()", &[])
            .await?;
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }
        Ok(purged)
    }
}
