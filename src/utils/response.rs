use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::Event;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn json<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    (status, Json(body)).into_response()
}

pub fn message(status: StatusCode, message: impl Into<String>) -> Response {
    json(
        status,
        MessageResponse {
            message: message.into(),
        },
    )
}

pub fn error(message: impl Into<String>, status: StatusCode) -> Response {
    json(
        status,
        ErrorResponse {
            error: message.into(),
        },
    )
}
