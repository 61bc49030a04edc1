use actix_web::HttpResponse;

pub async fn health_check() -> HttpResponse {
    tracing::debug!("Health check endpoint called");
    HttpResponse::Ok().finish()
}

/// GET /
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "API online" }))
}
