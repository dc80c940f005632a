//! Password hashing and verification

use crate::auth::models::User;
use crate::error::Result;

/// bcrypt cost factor
pub const HASH_COST: u32 = 10;

/// Hash a plaintext password with a per-hash random salt
pub fn hash(plaintext: &str) -> Result<String> {
    Ok(bcrypt::hash(plaintext, HASH_COST)?)
}

/// Check a candidate password against a user's stored hash
pub fn verify(user: &User, candidate: &str) -> Result<bool> {
    Ok(bcrypt::verify(candidate, &user.password)?)
}
