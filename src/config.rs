//! Runtime configuration, assembled from CLI flags and environment variables

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on (PORT)
    pub port: u16,
    /// PostgreSQL connection string (DATABASE_URL)
    pub database_url: String,
    /// Secret used to sign the session cookie (SESSION_SECRET)
    pub session_secret: String,
    /// Directory of static front-end assets
    pub static_dir: PathBuf,
}

impl Config {
    pub fn new(
        host: String,
        port: u16,
        database_url: String,
        session_secret: String,
        static_dir: PathBuf,
    ) -> Result<Self> {
        if session_secret.trim().is_empty() {
            return Err(Error::Config(
                "SESSION_SECRET must not be empty".to_string(),
            ));
        }
        if database_url.trim().is_empty() {
            return Err(Error::Config("DATABASE_URL must not be empty".to_string()));
        }

        Ok(Self {
            host,
            port,
            database_url,
            session_secret,
            static_dir,
        })
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
