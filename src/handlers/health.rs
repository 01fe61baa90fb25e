use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::json;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
}

pub async fn health_check() -> Response {
    json(StatusCode::OK, HealthPayload { status: "healthy" })
}

pub async fn root() -> Response {
    (StatusCode::OK, "Hello, World!").into_response()
}
