use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{EventRepository, RepositoryError};
use crate::models::{Event, EventPayload};

/// Event repository held entirely in process memory.
///
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<String, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, payload: &EventPayload) -> Result<Event, RepositoryError> {
        let mut events = self.events.write().await;
        if events.contains_key(&payload.id) {
            return Err(RepositoryError::Database(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint: id '{}'",
                payload.id
            ))));
        }

        let event = payload.clone().into_event(Utc::now());
        events.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    async fn get_by_id(&self, id: &str) -> Result<Event, RepositoryError> {
        let events = self.events.read().await;
        events
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_all(&self) -> Result<Vec<Event>, RepositoryError> {
        let events = self.events.read().await;
        Ok(events.values().cloned().collect())
    }

    async fn update(&self, payload: &EventPayload) -> Result<(), RepositoryError> {
        let mut events = self.events.write().await;
        if let Some(event) = events.get_mut(&payload.id) {
            event.title = payload.title.clone();
            event.description = payload.description.clone();
            event.start_time = payload.start_time;
            event.end_time = payload.end_time;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.events.write().await.remove(id);
        Ok(())
    }
}
