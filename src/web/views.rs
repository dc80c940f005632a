//! View handlers rendering the minijinja templates

use axum::extract::State;
use axum::response::Html;
use minijinja::context;

use crate::auth::models::UserProfile;
use crate::auth::session::SessionContext;
use crate::error::Result;

use super::server::{AppState, SharedState};

fn render(state: &AppState, name: &str, ctx: minijinja::Value) -> Result<Html<String>> {
    let template = state.templates.get_template(name)?;
    Ok(Html(template.render(ctx)?))
}

/// GET / — home view, with the user's profile when authenticated
pub async fn home(
    State(state): State<SharedState>,
    ctx: SessionContext,
) -> Result<Html<String>> {
    let user: Option<UserProfile> = match ctx.user_id {
        Some(id) => state
            .db
            .find_user_by_id(id)
            .await?
            .as_ref()
            .map(UserProfile::from),
        None => None,
    };

    render(&state, "index", context! { user })
}

/// GET /login — login form with any pending messages, displayed once
pub async fn login_page(
    State(state): State<SharedState>,
    ctx: SessionContext,
) -> Result<Html<String>> {
    if let Some(session_id) = ctx.session_id {
        if !ctx.errors.is_empty() {
            state.db.clear_session_errors(session_id).await?;
        }
    }

    render(&state, "login", context! { errors => ctx.errors })
}

/// GET /register — registration form with any pending messages, displayed once
pub async fn register_page(
    State(state): State<SharedState>,
    ctx: SessionContext,
) -> Result<Html<String>> {
    if let Some(session_id) = ctx.session_id {
        if !ctx.errors.is_empty() {
            state.db.clear_session_errors(session_id).await?;
        }
    }

    render(&state, "register", context! { errors => ctx.errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::server::build_templates;

    #[test]
    fn test_index_renders_user_context() {
        let env = build_templates().unwrap();
        let profile = UserProfile {
            username: "ann".to_string(),
            email: "ann@x.com".to_string(),
        };
        let html = env
            .get_template("index")
            .unwrap()
            .render(context! { user => profile })
            .unwrap();
        assert!(html.contains("ann"));
        assert!(html.contains("ann@x.com"));
        assert!(html.contains("/auth/logout"));
    }

    #[test]
    fn test_index_renders_without_user() {
        let env = build_templates().unwrap();
        let html = env
            .get_template("index")
            .unwrap()
            .render(context! {})
            .unwrap();
        assert!(html.contains("/login"));
        assert!(html.contains("/register"));
        assert!(!html.contains("/auth/logout"));
    }

    #[test]
    fn test_login_view_shows_errors() {
        let env = build_templates().unwrap();
        let errors = vec!["Your password is incorrect".to_string()];
        let html = env
            .get_template("login")
            .unwrap()
            .render(context! { errors })
            .unwrap();
        assert!(html.contains("Your password is incorrect"));
    }

    #[test]
    fn test_register_view_without_errors() {
        let env = build_templates().unwrap();
        let html = env
            .get_template("register")
            .unwrap()
            .render(context! { errors => Vec::<String>::new() })
            .unwrap();
        assert!(html.contains("/auth/register"));
    }
}
