//! Session context and signed session cookies
//!
//! The client holds an opaque session id as an HMAC-signed cookie; all state
//! (the authenticated `user_id` and any pending error messages) lives in the
//! sessions table. Handlers receive the loaded state as an explicit
//! [`SessionContext`] extractor instead of reaching into request globals.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::Error;
use crate::web::server::SharedState;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const COOKIE_NAME: &str = "vestibule_session";

/// Request-scoped session state threaded through each handler
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Id of the session row backing this request, if the cookie was valid
    pub session_id: Option<Uuid>,
    /// Authenticated user, if any
    pub user_id: Option<i32>,
    /// Pending messages to display on the next auth view
    pub errors: Vec<String>,
}

impl SessionContext {
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

fn mac_for(secret: &str) -> HmacSha256 {
    // HMAC-SHA256 accepts keys of any length; this cannot fail
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size")
}

/// Sign a session id into a cookie value: `<uuid>.<hex hmac tag>`
pub fn sign_session_id(secret: &str, id: &Uuid) -> String {
    let mut mac = mac_for(secret);
    mac.update(id.as_bytes());
    format!("{}.{}", id, hex::encode(mac.finalize().into_bytes()))
}

/// Verify a signed cookie value and recover the session id.
/// Returns `None` for malformed values, bad signatures, or a wrong secret.
pub fn verify_cookie_value(secret: &str, value: &str) -> Option<Uuid> {
    let (id_part, hex_tag) = value.split_once('.')?;
    let id = Uuid::parse_str(id_part).ok()?;

    let expected = hex::decode(hex_tag).ok()?;
    let mut mac = mac_for(secret);
    mac.update(id.as_bytes());

    // Constant-time comparison
    mac.verify_slice(&expected).is_ok().then_some(id)
}

/// Pull the session id out of the request's Cookie header, if present and
/// correctly signed
pub fn session_id_from_headers(headers: &HeaderMap, secret: &str) -> Option<Uuid> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    cookie_str.split(';').find_map(|cookie| {
        let value = cookie.trim().strip_prefix(COOKIE_NAME)?.strip_prefix('=')?;
        verify_cookie_value(secret, value)
    })
}

/// Build a Set-Cookie value establishing the session cookie
pub fn set_cookie(secret: &str, id: &Uuid) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        COOKIE_NAME,
        sign_session_id(secret, id)
    )
}

/// Build a Set-Cookie value that removes the session cookie
pub fn clear_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", COOKIE_NAME)
}

impl FromRequestParts<SharedState> for SessionContext {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(id) = session_id_from_headers(&parts.headers, &state.config.session_secret)
        else {
            return Ok(Self::default());
        };

        // A valid cookie can still point at an expired or deleted row
        match state.db.get_session(id).await? {
            Some(record) => Ok(Self {
                session_id: Some(id),
                user_id: record.user_id,
                errors: record.errors,
            }),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_sign_and_verify_round_trip() {
        let id = Uuid::new_v4();
        let value = sign_session_id(SECRET, &id);
        assert_eq!(verify_cookie_value(SECRET, &value), Some(id));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let id = Uuid::new_v4();
        let value = sign_session_id(SECRET, &id);
        assert_eq!(verify_cookie_value("other-secret", &value), None);
    }

    #[test]
    fn test_tampered_id_rejected() {
        let id = Uuid::new_v4();
        let value = sign_session_id(SECRET, &id);
        let (_, tag) = value.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), tag);
        assert_eq!(verify_cookie_value(SECRET, &forged), None);
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert_eq!(verify_cookie_value(SECRET, ""), None);
        assert_eq!(verify_cookie_value(SECRET, "no-dot-here"), None);
        assert_eq!(verify_cookie_value(SECRET, "not-a-uuid.abcdef"), None);
    }

    #[test]
    fn test_session_id_from_headers() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("other=1; {}={}", COOKIE_NAME, sign_session_id(SECRET, &id))
                .parse()
                .unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers, SECRET), Some(id));
    }

    #[test]
    fn test_missing_cookie_header() {
        let headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers, SECRET), None);
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
