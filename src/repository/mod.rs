//! Persistence for [`Event`]s.
//!
//! Handlers only see the [`EventRepository`] trait. Production wiring uses
//! [`PgEventRepository`]; [`InMemoryEventRepository`] backs tests and local
//! runs without a database.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Event, EventPayload};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("event '{0}' not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts a new event and returns it as stored, with `created_at`
    /// assigned by the store.
    async fn create(&self, payload: &EventPayload) -> Result<Event, RepositoryError>;

    /// Fails with [`RepositoryError::NotFound`] when no row has this id.
    async fn get_by_id(&self, id: &str) -> Result<Event, RepositoryError>;

    /// Every stored event, in whatever order the store returns them.
    async fn get_all(&self) -> Result<Vec<Event>, RepositoryError>;

    /// Overwrites the mutable fields of the event with `payload.id`.
    ///
    /// An id that matches nothing is not an error and creates nothing.
    async fn update(&self, payload: &EventPayload) -> Result<(), RepositoryError>;

    /// Removes the event if present. Missing ids are ignored.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
