//! HTTP server: shared state, router, bind/serve loop

use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use minijinja::Environment;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;

use super::{routes, views};

/// How often expired session rows are swept
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub templates: Environment<'static>,
}

pub type SharedState = Arc<AppState>;

/// Build the template environment with every view registered
pub fn build_templates() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("base", include_str!("../../templates/base.html"))?;
    env.add_template("index", include_str!("../../templates/index.html"))?;
    env.add_template("login", include_str!("../../templates/login.html"))?;
    env.add_template("register", include_str!("../../templates/register.html"))?;
    Ok(env)
}

/// Run the HTTP server
pub async fn run_server(config: Config) -> Result<()> {
    let db = Database::connect(&config.database_url).await?;
    db.sync_schema().await?;

    let templates = build_templates()?;
    let state: SharedState = Arc::new(AppState {
        config,
        db,
        templates,
    });

    // Background sweep so abandoned sessions do not pile up
    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = sweeper.db.purge_expired_sessions().await {
                tracing::warn!("Session purge failed: {}", e);
            }
        }
    });

    let addr = state.config.bind_addr();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
fn create_router(state: SharedState) -> Router {
    Router::new()
        // Views
        .route("/", get(views::home))
        .route("/login", get(views::login_page))
        .route("/register", get(views::register_page))
        // Auth flow
        .route("/auth/register", post(routes::register))
        .route("/auth/login", post(routes::login))
        .route("/auth/logout", get(routes::logout))
        // Static front-end assets
        .fallback_service(ServeDir::new(&state.config.static_dir))
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::redirect_if_authenticated,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
