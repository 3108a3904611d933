use crate::common::{harness, issue_key};
use crate::test_app;
use actix_web::test;

#[actix_web::test]
async fn health_and_models_are_reachable_without_a_key() {
    let h = harness().await;
    let app = test::init_service(test_app!(h)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({"status": "ok", "service": "aicarousel"}));

    let req = test::TestRequest::get().uri("/v1/models").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/v1/models/gpt-4").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn chat_completions_without_a_key_is_401() {
    let h = harness().await;
    let app = test::init_service(test_app!(h)).await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(serde_json::json!({"messages": [{"role": "user", "content": "hi"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn messages_without_a_key_gets_an_anthropic_shaped_401() {
    let h = harness().await;
    let app = test::init_service(test_app!(h)).await;

    let req = test::TestRequest::post()
        .uri("/v1/messages")
        .set_json(serde_json::json!({"messages": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["type"], "error");
    assert_eq!(body["error"]["type"], "authentication_error");
}

#[actix_web::test]
async fn a_freshly_issued_key_passes_the_guard() {
    let h = harness().await;
    let key = issue_key(&h).await;
    let app = test::init_service(test_app!(h)).await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .insert_header(("authorization", format!("Bearer {key}")))
        .set_json(serde_json::json!({"messages": [{"role": "user", "content": "hi"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    // Authenticated, but no provider is active in this harness — the
    // request reaches the dispatch core and fails there, not at the guard.
    assert_ne!(resp.status(), 401);
}
