use actix_web::{web, HttpResponse};
use serde::Serialize;

use super::current_user;
use crate::auth::{BearerToken, TokenService};
use crate::error::AppError;
use crate::store::UserStore;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub created_at: String,
    pub modified_at: String,
}

/// GET /get_current_user
pub async fn get_current_user(
    token: web::ReqData<BearerToken>,
    users: web::Data<dyn UserStore>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&token, tokens.get_ref(), users.get_ref()).await?;

    let body = UserResponse {
        id: user.id,
        username: user.username,
        created_at: user.created_at.to_rfc3339(),
        modified_at: user.updated_at.to_rfc3339(),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status_code": 200,
        "user": body
    })))
}

/// DELETE /delete_user
///
/// Removes the caller's account and bookings. Tokens already issued keep
/// verifying until they expire but no longer resolve to a user.
pub async fn delete_user(
    token: web::ReqData<BearerToken>,
    users: web::Data<dyn UserStore>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&token, tokens.get_ref(), users.get_ref()).await?;
    users.delete(user.id).await?;

    tracing::info!(user_id = user.id, "User deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status_code": 200,
        "message": "user deleted"
    })))
}
