//! Per-field credential validation
//!
//! Each validator returns a typed result so handlers can compose them before
//! touching the store. Messages are the human-readable strings shown on the
//! login/register views.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum username length
pub const MIN_USERNAME_LEN: usize = 2;
/// Minimum password length (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;

/// A failed check on a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Compile-time constant pattern; a failure here is a bug in the codebase
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex pattern")
    })
}

/// Validate a username: required, minimum length 2
pub fn username(value: &str) -> Result<(), FieldError> {
    if value.trim().chars().count() < MIN_USERNAME_LEN {
        return Err(FieldError::new(
            "username",
            format!(
                "Username must be at least {} characters long.",
                MIN_USERNAME_LEN
            ),
        ));
    }
    Ok(())
}

/// Validate an email address: required, syntactically valid
pub fn email(value: &str) -> Result<(), FieldError> {
    if !email_regex().is_match(value.trim()) {
        return Err(FieldError::new(
            "email",
            "Must provide a valid email address.",
        ));
    }
    Ok(())
}

/// Validate a plaintext password: required, minimum length 6
pub fn password(value: &str) -> Result<(), FieldError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldError::new(
            "password",
            format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LEN
            ),
        ));
    }
    Ok(())
}

/// Run every registration check and collect the failures
pub fn registration(
    username_value: &str,
    email_value: &str,
    password_value: &str,
) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = [
        username(username_value).err(),
        email(email_value).err(),
        password(password_value).err(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_too_short() {
        assert!(username("a").is_err());
        assert!(username("").is_err());
        assert!(username(" x ").is_err());
    }

    #[test]
    fn test_username_valid() {
        assert!(username("ab").is_ok());
        assert!(username("ann").is_ok());
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert!(email("").is_err());
        assert!(email("not-an-email").is_err());
        assert!(email("missing@tld").is_err());
        assert!(email("two words@x.com").is_err());
        assert!(email("@x.com").is_err());
    }

    #[test]
    fn test_email_accepts_valid() {
        assert!(email("ann@x.com").is_ok());
        assert!(email("first.last@example.co.uk").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert!(password("").is_err());
        assert!(password("12345").is_err());
    }

    #[test]
    fn test_password_valid() {
        assert!(password("secret1").is_ok());
        assert!(password("123456").is_ok());
    }

    #[test]
    fn test_registration_collects_all_failures() {
        let errors = registration("a", "nope", "123").unwrap_err();
        assert_eq!(errors.len(), 3);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn test_registration_ok() {
        assert!(registration("ann", "ann@x.com", "secret1").is_ok());
    }
}
