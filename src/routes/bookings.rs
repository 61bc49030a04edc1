/// Booking Routes
///
/// Every operation is scoped to the user behind the bearer token.

use actix_web::{web, HttpResponse};

use super::current_user;
use crate::auth::{BearerToken, TokenService};
use crate::domain::NewBooking;
use crate::error::{AppError, DatabaseError};
use crate::store::{BookingStore, UserStore};
use crate::validators::is_valid_comment;

/// POST /create_booking
///
/// # Errors
/// - 400: malformed times, or `end_time` not after `start_time`
pub async fn create_booking(
    token: web::ReqData<BearerToken>,
    form: web::Json<NewBooking>,
    users: web::Data<dyn UserStore>,
    bookings: web::Data<dyn BookingStore>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&token, tokens.get_ref(), users.get_ref()).await?;

    let mut booking = form.into_inner();
    booking.validate()?;
    booking.comment = is_valid_comment(&booking.comment)?;

    let booking = bookings.create(user.id, booking).await?;
    tracing::info!(user_id = user.id, booking_id = booking.id, "Booking created");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status_code": 200,
        "booking_id": booking.id
    })))
}

/// GET /get_bookings
pub async fn get_bookings(
    token: web::ReqData<BearerToken>,
    users: web::Data<dyn UserStore>,
    bookings: web::Data<dyn BookingStore>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&token, tokens.get_ref(), users.get_ref()).await?;
    let bookings = bookings.list_for_user(user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status_code": 200,
        "bookings": bookings
    })))
}

/// DELETE /remove_booking/{booking_id}
///
/// # Errors
/// - 404: no such booking for this user
pub async fn remove_booking(
    token: web::ReqData<BearerToken>,
    path: web::Path<i64>,
    users: web::Data<dyn UserStore>,
    bookings: web::Data<dyn BookingStore>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&token, tokens.get_ref(), users.get_ref()).await?;
    let booking_id = path.into_inner();

    if !bookings.remove(user.id, booking_id).await? {
        return Err(DatabaseError::NotFound("Booking not found".to_string()).into());
    }

    tracing::info!(user_id = user.id, booking_id, "Booking removed");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status_code": 200,
        "message": "booking removed"
    })))
}
