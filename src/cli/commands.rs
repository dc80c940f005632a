//! CLI command implementations

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::db::Database;
use crate::web;

/// Run the web server
pub async fn serve(
    host: String,
    port: u16,
    database_url: String,
    session_secret: String,
    static_dir: PathBuf,
) -> Result<()> {
    let config = Config::new(host, port, database_url, session_secret, static_dir)?;
    web::run_server(config).await?;
    Ok(())
}

/// Sync the schema without starting the server
pub async fn init_db(database_url: &str) -> Result<()> {
    let db = Database::connect(database_url).await?;
    db.sync_schema().await?;
    println!("Database tables created");
    Ok(())
}
