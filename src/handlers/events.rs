use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::EventPayload;
use crate::repository::RepositoryError;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{json, message, CreatedResponse, EventListResponse};

/// Runs a repository call under the request deadline.
///
/// Dropping the returned future (client went away) drops the in-flight
/// query with it.
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::Timeout(limit)),
    }
}

fn decode_payload(body: &[u8]) -> Result<EventPayload, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Rejected event payload");
        AppError::ValidationError("Invalid request payload".to_string())
    })
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let repo = state.repository()?;
    let events = bounded(state.request_timeout, repo.get_all()).await?;

    Ok(json(StatusCode::OK, EventListResponse { events }))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let repo = state.repository()?;
    let event = bounded(state.request_timeout, repo.get_by_id(&id)).await?;

    Ok(json(StatusCode::OK, event))
}

pub async fn create_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let repo = state.repository()?;
    let payload = decode_payload(&body)?.with_generated_id();

    let event = bounded(state.request_timeout, repo.create(&payload)).await?;
    info!(event_id = %event.id, "Event created");

    Ok(json(
        StatusCode::CREATED,
        CreatedResponse {
            message: "Event created successfully".to_string(),
            event,
        },
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let repo = state.repository()?;
    let payload = decode_payload(&body)?;
    if !payload.has_id() {
        return Err(AppError::ValidationError(
            "Event id is required".to_string(),
        ));
    }

    bounded(state.request_timeout, repo.update(&payload)).await?;
    info!(event_id = %payload.id, "Event updated");

    Ok(message(StatusCode::OK, "Event updated successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_maps_elapsed_to_timeout() {
        let limit = Duration::from_millis(10);
        let slow = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<_, RepositoryError>(())
        };

        let result = bounded(limit, slow).await;
        assert!(matches!(result, Err(AppError::Timeout(d)) if d == limit));
    }

    #[tokio::test]
    async fn test_bounded_passes_repository_errors_through() {
        let failing = async { Err::<(), _>(RepositoryError::NotFound("x".into())) };
        let result = bounded(Duration::from_secs(1), failing).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_decode_payload_rejects_non_json() {
        let result = decode_payload(b"not json");
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
