//! HTTP surface: server bootstrap, auth routes, rendered views

pub mod routes;
pub mod server;
pub mod views;

pub use server::{run_server, AppState, SharedState};
