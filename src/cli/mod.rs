//! CLI interface for Vestibule

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vestibule")]
#[command(version)]
#[command(about = "Server-rendered email/password auth with database-backed sessions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3333")]
        port: u16,

        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,

        /// Secret used to sign session cookies
        #[arg(long, env = "SESSION_SECRET")]
        session_secret: String,

        /// Directory of static front-end assets
        #[arg(long, default_value = "front")]
        static_dir: PathBuf,
    },

    /// Create the database tables and exit
    InitDb {
        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}
