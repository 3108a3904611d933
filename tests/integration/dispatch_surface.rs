use crate::common::{harness, issue_key};
use crate::test_app;
use actix_web::test;

#[actix_web::test]
async fn no_active_providers_surfaces_as_a_503_with_openai_shaped_body() {
    let h = harness().await;
    let key = issue_key(&h).await;
    let app = test::init_service(test_app!(h)).await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .insert_header(("authorization", format!("Bearer {key}")))
        .set_json(serde_json::json!({"messages": [{"role": "user", "content": "hi"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["type"], "api_error");
}

#[actix_web::test]
async fn no_active_providers_surfaces_as_a_503_with_anthropic_shaped_body() {
    let h = harness().await;
    let key = issue_key(&h).await;
    let app = test::init_service(test_app!(h)).await;

    let req = test::TestRequest::post()
        .uri("/v1/messages")
        .insert_header(("authorization", format!("Bearer {key}")))
        .set_json(serde_json::json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 64,
            "messages": [{"role": "user", "content": "hi"}],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["type"], "error");
    assert_eq!(body["error"]["type"], "api_error");
}

#[actix_web::test]
async fn malformed_request_body_is_a_400_not_a_dispatch_failure() {
    let h = harness().await;
    let key = issue_key(&h).await;
    let app = test::init_service(test_app!(h)).await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .insert_header(("authorization", format!("Bearer {key}")))
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
