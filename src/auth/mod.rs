//! Authentication: credentials, password hashing, sessions, route guard

pub mod middleware;
pub mod models;
pub mod password;
pub mod session;
pub mod validate;

pub use middleware::redirect_if_authenticated;
pub use models::{NewUser, User, UserProfile};
pub use session::{SessionContext, COOKIE_NAME};
