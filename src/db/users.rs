//! User table queries

use tokio_postgres::Row;

use crate::auth::models::{NewUser, User};
use crate::db::Database;
use crate::error::Result;

const USER_COLUMNS: &str = "id, username, email, password, created_at";

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password: row.get("password"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    /// Insert a ready-to-persist user and return the stored row
    pub async fn insert_user(&self, new_user: &NewUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let row = self
            .client()
            .query_one(
                query.as_str(),
                &[&new_user.username, &new_user.email, &new_user.password],
            )
            .await?;

        let user = user_from_row(&row);
        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    /// Look a user up by email, the de-facto login key
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = self.client().query_opt(query.as_str(), &[&email]).await?;
        Ok(row.as_ref().map(user_from_row))
    }

    /// Look a user up by id
    pub async fn find_user_by_id(&self, id: i32) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = self.client().query_opt(query.as_str(), &[&id]).await?;
        Ok(row.as_ref().map(user_from_row))
    }
}
