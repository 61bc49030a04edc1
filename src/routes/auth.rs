/// Authentication Routes
///
/// Registration, login, and the refresh token exchange.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, refresh_session, verify_login, TokenPair, TokenService};
use crate::domain::NewUser;
use crate::error::{AppError, AuthError};
use crate::store::UserStore;
use crate::validators::{is_valid_password, is_valid_username};

/// User registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Login form, `application/x-www-form-urlencoded`
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token refresh request
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Access and refresh tokens handed to the client
#[derive(Serialize)]
pub struct TokenResponse {
    pub status_code: u16,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    fn new(pair: TokenPair, expires_in: i64) -> Self {
        Self {
            status_code: 200,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// POST /register
///
/// # Errors
/// - 400: invalid username or password
/// - 409: username already registered
pub async fn register(
    form: web::Json<RegisterRequest>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let RegisterRequest { username, password } = form.into_inner();
    let username = is_valid_username(&username)?;
    is_valid_password(&password)?;

    // bcrypt is deliberately slow; keep it off the async workers
    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    let user = users
        .save(NewUser {
            username,
            password_hash,
        })
        .await?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        "User registered successfully"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status_code": 200,
        "message": "user registered"
    })))
}

/// POST /login
///
/// Unknown user and wrong password produce the same 401 after the same
/// amount of bcrypt work.
pub async fn login(
    form: web::Form<LoginForm>,
    users: web::Data<dyn UserStore>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let LoginForm { username, password } = form.into_inner();
    let user = users.find_by_username(username.trim()).await?;

    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password_valid = web::block(move || verify_login(&password, stored_hash.as_deref()))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?;

    let user = match user {
        Some(user) if password_valid => user,
        _ => return Err(AuthError::InvalidCredentials.into()),
    };

    let pair = tokens.issue_pair(&user.username)?;

    tracing::info!(
        user_id = user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(TokenResponse::new(pair, tokens.access_ttl())))
}

/// POST /refresh
///
/// The presented refresh token is not revoked.
///
/// # Errors
/// - 400: invalid or expired refresh token, or its user no longer exists
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    users: web::Data<dyn UserStore>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let (username, pair) =
        refresh_session(&form.refresh_token, tokens.get_ref(), users.get_ref()).await?;

    tracing::info!(
        username = %username,
        "Token refreshed successfully"
    );

    Ok(HttpResponse::Ok().json(TokenResponse::new(pair, tokens.access_ttl())))
}
