use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error,
};
use futures::future::LocalBoxFuture;
use log::{info, warn};
use std::future::Future;
use std::rc::Rc;
use std::time::Instant;
use tracing::Instrument;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Id of the request currently being served, or a fresh one outside a request
pub fn current_request_id() -> String {
    REQUEST_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string())
}

/// Run `fut` with `request_id` visible to `current_request_id`
pub async fn with_request_id<F: Future>(request_id: String, fut: F) -> F::Output {
    REQUEST_ID.scope(request_id, fut).await
}

/// Access log middleware
///
/// One line when a request arrives and one when it completes. Header values
/// are never logged, so bearer tokens stay out of the logs.
///
/// Each request gets an id that tags every log line emitted while serving it,
/// becomes the `error_id` of any error body, and is echoed back in the
/// `x-request-id` response header.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(RequestLoggerService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestLoggerService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("http_request", request_id = %request_id);

        let service = self.service.clone();
        let scoped_id = request_id.clone();

        let fut = async move {
            info!("Request started: {} {} [{}]", method, path, request_id);

            let mut result = service.call(req).await;
            let elapsed = start_time.elapsed().as_millis();

            match &mut result {
                Ok(res) => {
                    info!(
                        "Request completed: {} {} - Status: {} ({}ms) [{}]",
                        method,
                        path,
                        res.status().as_u16(),
                        elapsed,
                        request_id
                    );
                    if let Ok(value) = HeaderValue::from_str(&request_id) {
                        res.headers_mut()
                            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                    }
                }
                // Errors that escape the inner services are rendered by the server later
                Err(e) => warn!(
                    "Request failed: {} {} - Status: {} ({}ms) [{}]",
                    method,
                    path,
                    e.as_response_error().status_code().as_u16(),
                    elapsed,
                    request_id
                ),
            }

            result
        };

        Box::pin(with_request_id(scoped_id, fut).instrument(span))
    }
}
