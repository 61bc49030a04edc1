/// Bearer credential classification
///
/// Turns the raw `Authorization` header into either a verified access token
/// or the reason it was refused. Stateless; one call, one outcome.

use crate::auth::tokens::{TokenClass, TokenService};
use crate::error::AuthError;

pub const BEARER_SCHEME: &str = "Bearer";

/// Raw access token that passed verification
///
/// Handlers re-decode it to learn the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Classify an `Authorization` header value
///
/// The value must be `Bearer <token>`: exact scheme, one space, and the
/// token taken verbatim with no trimming.
///
/// - absent, blank, or nothing after the scheme: `MissingCredential`
/// - scheme other than exactly `Bearer`: `WrongScheme`
/// - credential padded with whitespace, or not a valid, unexpired access
///   token: `InvalidOrExpiredToken`
pub fn authenticate(
    header: Option<&str>,
    tokens: &TokenService,
) -> Result<BearerToken, AuthError> {
    let header = header
        .filter(|h| !h.trim().is_empty())
        .ok_or(AuthError::MissingCredential)?;

    let (scheme, credential) = header.split_once(' ').unwrap_or((header, ""));

    if scheme != BEARER_SCHEME {
        return Err(AuthError::WrongScheme);
    }

    if credential.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    if credential.contains(char::is_whitespace)
        || !tokens.is_valid(credential, TokenClass::Access)
    {
        return Err(AuthError::InvalidOrExpiredToken);
    }

    Ok(BearerToken(credential.to_string()))
}
