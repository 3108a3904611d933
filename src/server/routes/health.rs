//! `GET /health` (spec.md §6.1).

use actix_web::{HttpResponse, Result as ActixResult};
use serde_json::json;

pub async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({"status": "ok", "service": "aicarousel"})))
}
