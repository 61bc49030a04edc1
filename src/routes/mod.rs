mod auth;
mod bookings;
mod health_check;
mod users;

pub use auth::{login, refresh, register};
pub use bookings::{create_booking, get_bookings, remove_booking};
pub use health_check::{health_check, root};
pub use users::{delete_user, get_current_user};

use crate::auth::{BearerToken, TokenService};
use crate::domain::User;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::store::UserStore;

/// Resolve the account behind a token the bearer gate already accepted
///
/// The token is decoded again for its subject; a user deleted since the
/// token was issued is a 404.
pub(crate) async fn current_user(
    token: &BearerToken,
    tokens: &TokenService,
    users: &dyn UserStore,
) -> Result<User, AppError> {
    let username = tokens
        .access_subject(token.as_str())
        .ok_or(AppError::Unauthenticated(AuthError::InvalidOrExpiredToken))?;

    users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::Database(DatabaseError::NotFound("User not found".to_string())))
}
