/// Admin token middleware

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use super::handlers::ApiResponse;
use super::AppState;

/// Token from the `Authorization` header, with or without the `Bearer ` prefix
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get("Authorization")?.to_str().ok()?;
    Some(header.strip_prefix("Bearer ").unwrap_or(header).trim())
}

/// Whether a request carrying `provided` may pass
pub fn is_authorized(provided: Option<&str>, expected: Option<&str>) -> bool {
    match (provided, expected) {
        (Some(provided), Some(expected)) => provided == expected,
        // No token configured: admin routes are open
        (_, None) => true,
        (None, Some(_)) => false,
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let expected = state.admin_token.as_deref();

    if expected.is_none() {
        warn!(path = %request.uri().path(), "admin token not set - authentication disabled");
    }

    if is_authorized(extract_token(&headers), expected) {
        Ok(next.run(request).await)
    } else {
        Err(unauthorized_response())
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(
            "Unauthorized - invalid or missing authentication token".to_string(),
        )),
    )
        .into_response()
}
