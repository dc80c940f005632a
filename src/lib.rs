//! Vestibule - server-rendered email/password authentication
//!
//! A minimal login/register/logout flow over a relational user table, with
//! database-backed sessions carried by a signed cookie.

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod web;

pub use config::Config;
pub use error::Error;
