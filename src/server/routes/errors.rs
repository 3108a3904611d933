//! Format-matching error bodies for route handlers (spec.md §7).

use crate::utils::error::{GatewayError, WireFormat};
use actix_web::HttpResponse;

/// Render a `GatewayError` into the caller's wire format with the right
/// status code.
pub fn gateway_error_to_response(err: GatewayError, format: WireFormat) -> HttpResponse {
    HttpResponse::build(err.status_code()).json(err.to_body(format))
}

pub fn invalid_request(message: impl Into<String>, format: WireFormat) -> HttpResponse {
    gateway_error_to_response(GatewayError::InvalidRequest(message.into()), format)
}
