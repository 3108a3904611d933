//! Actix middleware guarding protected paths with `CredentialStore`
//! (spec.md §4.6).

use super::credential_store::CredentialStore;
use super::ApiKeyIdentity;
use crate::utils::error::{GatewayError, WireFormat};
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

/// Paths served without authentication (spec.md §4.6, §6.1).
fn is_public_path(path: &str) -> bool {
    path == "/health" || path == "/v1/models" || path.starts_with("/v1/models/")
}

/// Anthropic-style bodies apply to any `/v1/messages*` path; every other
/// protected path uses OpenAI-style bodies.
fn wire_format_for(path: &str) -> WireFormat {
    if path.starts_with("/v1/messages") {
        WireFormat::Anthropic
    } else {
        WireFormat::OpenAi
    }
}

fn extract_presented_key(req: &ServiceRequest) -> Option<String> {
    if let Some(value) = req.headers().get("authorization").and_then(|h| h.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }
    req.headers()
        .get("x-api-key")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

fn unauthorized(path: &str, message: &str) -> HttpResponse {
    let body = GatewayError::Authentication(message.to_string()).to_body(wire_format_for(path));
    HttpResponse::Unauthorized().json(body)
}

/// Transform that wires `AuthMiddlewareService` into an actix service chain.
pub struct AuthMiddleware {
    credential_store: Arc<CredentialStore>,
}

impl AuthMiddleware {
    pub fn new(credential_store: Arc<CredentialStore>) -> Self {
        Self { credential_store }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            credential_store: self.credential_store.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    credential_store: Arc<CredentialStore>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();

        if is_public_path(&path) {
            let service = self.service.clone();
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        }

        let Some(presented) = extract_presented_key(&req) else {
            let (http_req, _) = req.into_parts();
            let response = unauthorized(&path, "Missing API key");
            return Box::pin(async move {
                Ok(ServiceResponse::new(http_req, response).map_into_right_body())
            });
        };

        let credential_store = self.credential_store.clone();
        let service = self.service.clone();

        Box::pin(async move {
            match credential_store.validate(&presented).await {
                Ok(Some(record)) => {
                    req.extensions_mut().insert(ApiKeyIdentity { id: record.id });
                    Ok(service.call(req).await?.map_into_left_body())
                }
                Ok(None) => {
                    let (http_req, _) = req.into_parts();
                    let response = unauthorized(&path, "Invalid API key");
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                Err(e) => {
                    let (http_req, _) = req.into_parts();
                    let response = HttpResponse::InternalServerError().json(
                        GatewayError::Internal(format!("credential lookup failed: {e}"))
                            .to_body(wire_format_for(&path)),
                    );
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database;
    use actix_web::{HttpResponse, test, web};

    async fn credential_store() -> Arc<CredentialStore> {
        let db = database::connect("sqlite::memory:").await.unwrap();
        Arc::new(CredentialStore::new(db))
    }

    async fn echo() -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({"ok": true}))
    }

    macro_rules! app_with {
        ($store:expr) => {
            actix_web::App::new()
                .wrap(AuthMiddleware::new($store))
                .route("/health", web::get().to(echo))
                .route("/v1/models", web::get().to(echo))
                .route("/v1/models/{id}", web::get().to(echo))
                .route("/v1/chat/completions", web::post().to(echo))
                .route("/v1/messages", web::post().to(echo))
        };
    }

    #[actix_web::test]
    async fn public_paths_are_reachable_without_any_auth_header() {
        let store = credential_store().await;
        let app = test::init_service(app_with!(store)).await;

        for path in ["/health", "/v1/models", "/v1/models/gpt-4"] {
            let req = test::TestRequest::get().uri(path).to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success(), "expected {path} to be public");
        }
    }

    #[actix_web::test]
    async fn missing_key_on_a_protected_path_is_rejected_with_401_and_missing_message() {
        let store = credential_store().await;
        let app = test::init_service(app_with!(store)).await;

        let req = test::TestRequest::post().uri("/v1/chat/completions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Missing API key");
    }

    #[actix_web::test]
    async fn an_unrecognized_key_is_rejected_with_401_and_invalid_message() {
        let store = credential_store().await;
        let app = test::init_service(app_with!(store)).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header(("authorization", "Bearer sk-not-a-real-key"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Invalid API key");
    }

    #[actix_web::test]
    async fn a_valid_key_via_bearer_header_reaches_the_handler() {
        let store = credential_store().await;
        let (plaintext, _) = store.create(None).await.unwrap();
        let app = test::init_service(app_with!(store)).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header(("authorization", format!("Bearer {plaintext}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn a_valid_key_via_x_api_key_header_reaches_the_handler() {
        let store = credential_store().await;
        let (plaintext, _) = store.create(None).await.unwrap();
        let app = test::init_service(app_with!(store)).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header(("x-api-key", plaintext))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn protected_failures_on_messages_paths_use_anthropic_style_bodies() {
        let store = credential_store().await;
        let app = test::init_service(app_with!(store)).await;

        let req = test::TestRequest::post().uri("/v1/messages").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["type"], "error");
        assert_eq!(body["error"]["type"], "authentication_error");
    }

    #[actix_web::test]
    async fn protected_failures_outside_messages_paths_use_openai_style_bodies() {
        let store = credential_store().await;
        let app = test::init_service(app_with!(store)).await;

        let req = test::TestRequest::post().uri("/v1/chat/completions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert!(body["type"].is_null());
    }
}
