//! Auth flow handlers: register, login, logout
//!
//! The domain checks produce typed errors (validation, conflict, not-found,
//! bad password); the handlers convert those into a redirect back to the
//! form with messages parked on the session. Only store faults propagate.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::models::{NewUser, User};
use crate::auth::session::{self, SessionContext};
use crate::auth::{password, validate};
use crate::error::{Error, Result};

use super::server::SharedState;

const MISSING_FIELDS_MSG: &str = "Please check your credentials and try again.";
const EMAIL_TAKEN_MSG: &str = "A user already exists with that email address.";
const NO_SUCH_USER_MSG: &str = "No user account found matching that email address.";
const BAD_PASSWORD_MSG: &str = "Your password is incorrect";

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Treat absent and blank form values the same way
fn presence(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The session logout destroys: only one carrying an authenticated user.
/// An anonymous session (pending messages, no user) is left alone.
fn active_session(ctx: &SessionContext) -> Option<Uuid> {
    ctx.session_id.filter(|_| ctx.is_authenticated())
}

/// Require and validate the registration fields
fn parse_registration(form: &RegisterForm) -> Result<(&str, &str, &str)> {
    let (Some(username), Some(email), Some(plaintext)) = (
        presence(&form.username),
        presence(&form.email),
        presence(&form.password),
    ) else {
        return Err(Error::Validation(vec![MISSING_FIELDS_MSG.to_string()]));
    };

    validate::registration(username, email, plaintext)
        .map_err(|errors| Error::Validation(errors.into_iter().map(|e| e.message).collect()))?;

    Ok((username, email, plaintext))
}

/// Application-level uniqueness check; there is no column constraint
fn check_email_available(existing: Option<&User>) -> Result<()> {
    if existing.is_some() {
        tracing::debug!("Registration rejected, email already in use");
        return Err(Error::Conflict(EMAIL_TAKEN_MSG.to_string()));
    }
    Ok(())
}

/// Match a candidate password against the looked-up user, if any.
/// A failed comparison is a hard stop; no session may be established past
/// this point for an unauthenticated request.
fn verify_login(found: Option<User>, candidate: &str) -> Result<User> {
    let Some(user) = found else {
        return Err(Error::NotFound(NO_SUCH_USER_MSG.to_string()));
    };

    if !password::verify(&user, candidate)? {
        tracing::debug!(user_id = user.id, "Login rejected, password mismatch");
        return Err(Error::Auth(BAD_PASSWORD_MSG.to_string()));
    }

    Ok(user)
}

/// Convert a domain failure into the messages shown on the form; store
/// faults pass through untouched
fn form_messages(err: Error) -> Result<Vec<String>> {
    match err {
        Error::Validation(messages) => Ok(messages),
        Error::Conflict(message) | Error::NotFound(message) | Error::Auth(message) => {
            Ok(vec![message])
        }
        other => Err(other),
    }
}

/// Reuse the request's session row or create a fresh anonymous one
async fn ensure_session(state: &SharedState, ctx: &SessionContext) -> Result<Uuid> {
    match ctx.session_id {
        Some(id) => Ok(id),
        None => state.db.create_session(None).await,
    }
}

/// Redirect with the session cookie (re)established
fn redirect_with_cookie(state: &SharedState, session_id: Uuid, to: &str) -> Response {
    let cookie = session::set_cookie(&state.config.session_secret, &session_id);
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(to)).into_response()
}

/// Park error messages on the session and bounce back to the form
async fn redirect_back_with_errors(
    state: &SharedState,
    ctx: &SessionContext,
    back_to: &str,
    errors: Vec<String>,
) -> Result<Response> {
    let session_id = ensure_session(state, ctx).await?;
    state.db.set_session_errors(session_id, &errors).await?;
    Ok(redirect_with_cookie(state, session_id, back_to))
}

/// Mark the session as authenticated and send the client home
async fn establish_session(
    state: &SharedState,
    ctx: &SessionContext,
    user_id: i32,
) -> Result<Response> {
    let session_id = match ctx.session_id {
        Some(id) => {
            state.db.set_session_user(id, user_id).await?;
            if !ctx.errors.is_empty() {
                state.db.clear_session_errors(id).await?;
            }
            id
        }
        None => state.db.create_session(Some(user_id)).await?,
    };

    Ok(redirect_with_cookie(state, session_id, "/"))
}

/// Run the registration checks and insert the new user
async fn register_user(state: &SharedState, form: &RegisterForm) -> Result<User> {
    let (username, email, plaintext) = parse_registration(form)?;
    check_email_available(state.db.find_user_by_email(email).await?.as_ref())?;

    let new_user = NewUser::create(username, email, plaintext)?;
    state.db.insert_user(&new_user).await
}

/// Look the user up and check the candidate password
async fn login_user(state: &SharedState, form: &LoginForm) -> Result<User> {
    let (Some(email), Some(candidate)) = (presence(&form.email), presence(&form.password)) else {
        return Err(Error::Validation(vec![MISSING_FIELDS_MSG.to_string()]));
    };

    verify_login(state.db.find_user_by_email(email).await?, candidate)
}

/// POST /auth/register
pub async fn register(
    State(state): State<SharedState>,
    ctx: SessionContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    match register_user(&state, &form).await {
        Ok(user) => establish_session(&state, &ctx, user.id).await,
        Err(err) => {
            let messages = form_messages(err)?;
            redirect_back_with_errors(&state, &ctx, "/register", messages).await
        }
    }
}

/// POST /auth/login
pub async fn login(
    State(state): State<SharedState>,
    ctx: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match login_user(&state, &form).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "User logged in");
            establish_session(&state, &ctx, user.id).await
        }
        Err(err) => {
            let messages = form_messages(err)?;
            redirect_back_with_errors(&state, &ctx, "/login", messages).await
        }
    }
}

/// GET /auth/logout
pub async fn logout(State(state): State<SharedState>, ctx: SessionContext) -> Result<Response> {
    // Logging out without an authenticated session is a no-op redirect
    let Some(session_id) = active_session(&ctx) else {
        return Ok(Redirect::to("/").into_response());
    };

    state.db.delete_session(session_id).await?;

    let clear = session::clear_cookie();
    Ok((AppendHeaders([(SET_COOKIE, clear)]), Redirect::to("/")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored_user(plaintext: &str) -> User {
        User {
            id: 7,
            username: "ann".to_string(),
            email: "ann@x.com".to_string(),
            password: password::hash(plaintext).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn anonymous_session_with_errors() -> SessionContext {
        SessionContext {
            session_id: Some(Uuid::new_v4()),
            user_id: None,
            errors: vec![MISSING_FIELDS_MSG.to_string()],
        }
    }

    #[test]
    fn test_presence_treats_blank_as_missing() {
        assert_eq!(presence(&None), None);
        assert_eq!(presence(&Some(String::new())), None);
        assert_eq!(presence(&Some("   ".to_string())), None);
        assert_eq!(presence(&Some(" ann ".to_string())), Some("ann"));
    }

    #[test]
    fn test_logout_ignores_missing_session() {
        assert_eq!(active_session(&SessionContext::default()), None);
    }

    #[test]
    fn test_logout_preserves_anonymous_session() {
        // A session holding only pending messages is not an active login
        assert_eq!(active_session(&anonymous_session_with_errors()), None);
    }

    #[test]
    fn test_logout_targets_authenticated_session() {
        let id = Uuid::new_v4();
        let ctx = SessionContext {
            session_id: Some(id),
            user_id: Some(7),
            errors: Vec::new(),
        };
        assert_eq!(active_session(&ctx), Some(id));
    }

    #[test]
    fn test_duplicate_email_is_a_conflict() {
        let user = stored_user("secret1");
        match check_email_available(Some(&user)) {
            Err(Error::Conflict(message)) => assert_eq!(message, EMAIL_TAKEN_MSG),
            other => panic!("expected a conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_unused_email_is_available() {
        assert!(check_email_available(None).is_ok());
    }

    #[test]
    fn test_registration_missing_fields() {
        let form = RegisterForm {
            username: Some("ann".to_string()),
            email: None,
            password: Some("secret1".to_string()),
        };
        match parse_registration(&form) {
            Err(Error::Validation(messages)) => {
                assert_eq!(messages, vec![MISSING_FIELDS_MSG.to_string()]);
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_registration_invalid_fields() {
        let form = RegisterForm {
            username: Some("a".to_string()),
            email: Some("nope".to_string()),
            password: Some("123".to_string()),
        };
        match parse_registration(&form) {
            Err(Error::Validation(messages)) => assert_eq!(messages.len(), 3),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_login_unknown_email() {
        match verify_login(None, "secret1") {
            Err(Error::NotFound(message)) => assert_eq!(message, NO_SUCH_USER_MSG),
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[test]
    fn test_login_wrong_password_is_a_hard_stop() {
        let user = stored_user("secret1");
        match verify_login(Some(user), "wrong-password") {
            Err(Error::Auth(message)) => assert_eq!(message, BAD_PASSWORD_MSG),
            other => panic!("expected an auth failure, got {other:?}"),
        }
    }

    #[test]
    fn test_login_success_returns_user() {
        let user = verify_login(Some(stored_user("secret1")), "secret1").unwrap();
        assert_eq!(user.id, 7);
    }

    #[test]
    fn test_form_messages_covers_the_taxonomy() {
        let messages =
            form_messages(Error::Validation(vec!["a".to_string(), "b".to_string()])).unwrap();
        assert_eq!(messages.len(), 2);

        for err in [
            Error::Conflict(EMAIL_TAKEN_MSG.to_string()),
            Error::NotFound(NO_SUCH_USER_MSG.to_string()),
            Error::Auth(BAD_PASSWORD_MSG.to_string()),
        ] {
            assert_eq!(form_messages(err).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_form_messages_rethrows_store_faults() {
        assert!(form_messages(Error::Other("connection reset".to_string())).is_err());
    }
}
