/// Password Hashing and Verification
///
/// bcrypt with a fresh random salt on every hash. Verification never fails
/// loudly: a mismatch or an unreadable hash is simply `false`.

use bcrypt::{hash, verify, DEFAULT_COST};
use lazy_static::lazy_static;

use crate::error::AppError;

lazy_static! {
    // Stand-in for accounts that do not exist, hashed at the production cost
    static ref DUMMY_HASH: String = hash("no-such-account", DEFAULT_COST).unwrap_or_default();
}

/// Hash a password using bcrypt
///
/// # Errors
/// Returns error only if bcrypt itself fails (e.g. the RNG is unavailable)
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub(crate) fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its bcrypt hash
///
/// Comparison is done by bcrypt. A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    match verify(password, hashed) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Password verification against unreadable hash: {}", e);
            false
        }
    }
}

/// Verify a login attempt against a stored hash, if there is one
///
/// Without a stored hash the password is checked against a dummy hash of
/// the same cost and the result is always `false`, so an unknown username
/// takes as long to reject as a wrong password.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hashed) => verify_password(password, hashed),
        None => {
            let _ = verify_password(password, &DUMMY_HASH);
            false
        }
    }
}
