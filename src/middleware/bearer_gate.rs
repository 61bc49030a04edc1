/// Bearer Gate Middleware
///
/// Checks the Authorization header of every request in the wrapped scope.
/// A verified token is stored in request extensions as `BearerToken`;
/// anything else is refused with one uniform 403 response.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{authenticate, TokenService};
use crate::error::AppError;

/// Middleware for protecting routes with an access token
pub struct BearerGate {
    tokens: TokenService,
}

impl BearerGate {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerGateService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(BearerGateService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct BearerGateService<S> {
    service: Rc<S>,
    tokens: TokenService,
}

impl<S, B> Service<ServiceRequest> for BearerGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // A non-UTF-8 header is treated as absent
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match authenticate(header, &self.tokens) {
            Ok(token) => {
                req.extensions_mut().insert(token);
                tracing::debug!(path = %req.path(), "Bearer token accepted");

                let service = self.service.clone();
                Box::pin(async move {
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                })
            }
            Err(e) => {
                // The specific reason is only ever logged
                tracing::warn!(
                    path = %req.path(),
                    kind = e.kind(),
                    "Bearer gate rejected request"
                );
                // Rendered here so the error body carries this request's id
                let response = req
                    .error_response(AppError::Unauthenticated(e))
                    .map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BearerToken;
    use crate::configuration::JwtSettings;
    use actix_web::{test, web, App, HttpResponse};

    async fn echo(token: web::ReqData<BearerToken>) -> HttpResponse {
        HttpResponse::Ok().body(token.into_inner().0)
    }

    fn tokens() -> TokenService {
        TokenService::new(&JwtSettings::new("mw-access", "mw-refresh"))
    }

    #[actix_web::test]
    async fn test_gate_passes_token_through() {
        let tokens = tokens();
        let access = tokens.issue_access("alice").unwrap();
        let app = test::init_service(
            App::new()
                .wrap(BearerGate::new(tokens))
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, access.as_bytes());
    }

    #[actix_web::test]
    async fn test_gate_rejects_uniformly() {
        let tokens = tokens();
        let refresh = tokens.issue_refresh("alice").unwrap();
        let access = tokens.issue_access("alice").unwrap();
        let app = test::init_service(
            App::new()
                .wrap(BearerGate::new(tokens))
                .route("/", web::get().to(echo)),
        )
        .await;

        let headers = vec![
            None,
            Some("Basic xyz".to_string()),
            Some("Bearer invalid.token.here".to_string()),
            Some(format!("Bearer {}", refresh)),
            Some(format!("Bearer  {}", access)),
        ];

        let mut messages = Vec::new();
        for header in headers {
            let mut req = test::TestRequest::get().uri("/");
            if let Some(value) = &header {
                req = req.insert_header(("Authorization", value.clone()));
            }
            let response = test::call_service(&app, req.to_request()).await;
            assert_eq!(response.status().as_u16(), 403, "header: {:?}", header);

            let json: serde_json::Value = test::read_body_json(response).await;
            messages.push((json["message"].clone(), json["code"].clone()));
        }

        assert!(messages.windows(2).all(|w| w[0] == w[1]));
    }
}
