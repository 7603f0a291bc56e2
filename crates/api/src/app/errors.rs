use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use panaderia_catalog::ValidationError;
use panaderia_store::StoreError;

/// Map repository failures to HTTP responses: duplicate SKU is a 400
/// conflict on the submitted data, a missing id is 404, anything from the
/// backing store itself is a generic 500 (logged, never swallowed).
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::DuplicateSku(sku) => json_error(
            StatusCode::BAD_REQUEST,
            "duplicate_sku",
            format!("SKU {sku} already exists"),
        ),
        StoreError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
        }
        StoreError::Decode(msg) => {
            tracing::error!(%msg, "stored row failed to decode");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage error",
            )
        }
        StoreError::Unavailable(msg) => {
            tracing::error!(%msg, "store unavailable");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage error",
            )
        }
        StoreError::Database(e) => {
            tracing::error!(error = %e, "database failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage error",
            )
        }
    }
}

/// 422 with one entry per violated field.
pub fn validation_error_to_response(err: ValidationError) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "error": "validation_error",
            "message": err.to_string(),
            "fields": err.errors,
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
