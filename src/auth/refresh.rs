/// Refresh Token Protocol
///
/// A refresh token is a signed JWT under its own secret. Exchanging it
/// re-checks that the user still exists and mints a brand-new pair.
///
/// The presented token is not revoked and stays usable until its own `exp`.

use crate::auth::tokens::{TokenClass, TokenPair, TokenService};
use crate::error::{AppError, AuthError};
use crate::store::UserStore;

/// Exchange a refresh token for a fresh access/refresh pair
///
/// # Errors
/// - `InvalidOrExpiredToken` if the token does not verify under the refresh secret
/// - `UserNotFound` if its subject no longer exists
pub async fn refresh_session(
    refresh_token: &str,
    tokens: &TokenService,
    users: &dyn UserStore,
) -> Result<(String, TokenPair), AppError> {
    let claims = tokens
        .decode(refresh_token, TokenClass::Refresh)
        .ok_or(AuthError::InvalidOrExpiredToken)?;
    let username = claims.sub.username();

    let user = users
        .find_by_username(username)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let pair = tokens.issue_pair(&user.username)?;
    Ok((user.username, pair))
}
