/// Input validators for account and booking data
///
/// Usernames end up as token subjects and are matched exactly, so they are
/// restricted to a conservative character set.

use regex::Regex;
use lazy_static::lazy_static;

use crate::error::ValidationError;

const MAX_USERNAME_LENGTH: usize = 64;
// bcrypt only looks at the first 72 bytes
const MAX_PASSWORD_BYTES: usize = 72;
const MAX_COMMENT_LENGTH: usize = 1024;

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap();
}

/// Validates a username
/// - Trims surrounding whitespace
/// - Checks length constraints
/// - Restricts to letters, digits, `_`, `.`, `-`
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()));
    }

    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong(
            "username".to_string(),
            MAX_USERNAME_LENGTH,
        ));
    }

    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("username".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates a password before hashing
///
/// No strength rules; only what bcrypt can faithfully hash.
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_BYTES,
        ));
    }

    Ok(())
}

/// Validates a booking comment
pub fn is_valid_comment(comment: &str) -> Result<String, ValidationError> {
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(ValidationError::TooLong(
            "comment".to_string(),
            MAX_COMMENT_LENGTH,
        ));
    }

    if comment.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
        return Err(ValidationError::InvalidFormat("comment".to_string()));
    }

    Ok(comment.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert_eq!(is_valid_username("alice").unwrap(), "alice");
        assert_eq!(is_valid_username("  bob_1.x-y ").unwrap(), "bob_1.x-y");
    }

    #[test]
    fn test_invalid_username() {
        assert!(is_valid_username("").is_err());
        assert!(is_valid_username("   ").is_err());
        assert!(is_valid_username("with space").is_err());
        assert!(is_valid_username("semi;colon").is_err());
        assert!(is_valid_username("null\0byte").is_err());
    }

    #[test]
    fn test_username_length_limit() {
        assert!(is_valid_username(&"a".repeat(64)).is_ok());
        assert!(is_valid_username(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(is_valid_password("pw1").is_ok());
        assert!(is_valid_password("").is_err());
        assert!(is_valid_password(&"x".repeat(72)).is_ok());
        assert!(is_valid_password(&"x".repeat(73)).is_err());
    }

    #[test]
    fn test_comment_rules() {
        assert_eq!(is_valid_comment(" team sync ").unwrap(), "team sync");
        assert!(is_valid_comment("line one\nline two").is_ok());
        assert!(is_valid_comment("bell\u{7}").is_err());
        assert!(is_valid_comment(&"c".repeat(1025)).is_err());
    }
}
