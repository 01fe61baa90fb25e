use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{create_event, get_event, health_check, list_events, root, update_event};
use crate::state::AppState;

/// Builds the full application router.
///
/// Methods not listed on a path answer 405.
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .merge(event_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}

fn event_routes() -> Router<AppState> {
    let collection = get(list_events).post(create_event).put(update_event);

    Router::new()
        .route("/api/events", collection.clone())
        .route("/api/events/", collection)
        .route("/api/events/:id", get(get_event))
}
