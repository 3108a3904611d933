//! Route configuration and format-matching error bodies (spec.md §6.1).

pub mod anthropic;
pub mod errors;
pub mod health;
pub mod openai;
pub mod raw;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .route("/v1/chat/completions", web::post().to(openai::chat_completions))
        .route("/v1/models", web::get().to(openai::list_models))
        .route("/v1/models/{id}", web::get().to(openai::get_model))
        .route("/v1/messages", web::post().to(anthropic::messages))
        .route(
            "/v1/messages/count_tokens",
            web::post().to(anthropic::count_tokens),
        )
        .route("/chat", web::post().to(raw::chat));
}
