//! PostgreSQL access layer

pub mod sessions;
pub mod users;

pub use sessions::SessionRecord;

use crate::error::Result;

/// DDL applied at startup; idempotent, mirrors a sync-on-boot model.
///
/// Email uniqueness is deliberately NOT a column constraint: the registration
/// handler enforces it with a pre-insert lookup.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(250) NOT NULL,
    email VARCHAR(250) NOT NULL,
    password VARCHAR(250) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS sessions (
    id UUID PRIMARY KEY,
    user_id INTEGER,
    errors TEXT NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    expires_at TIMESTAMPTZ NOT NULL
);
";

/// Handle to the application database
pub struct Database {
    client: tokio_postgres::Client,
}

impl Database {
    /// Connect and spawn the background connection task
    pub async fn connect(database_url: &str) -> Result<Self> {
        let (client, connection) =
            tokio_postgres::connect(database_url, tokio_postgres::NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub(crate) fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }

    /// Create the users and sessions tables if they do not exist
    pub async fn sync_schema(&self) -> Result<()> {
        self.client.batch_execute(SCHEMA).await?;
        tracing::info!("Database schema synced");
        Ok(())
    }
}
