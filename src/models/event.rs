use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored event, as read back from the `events` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or updating an event.
///
/// `id` is optional on the wire and decodes to an empty string when absent.
/// Anything else the client sends, `created_at` included, is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl EventPayload {
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Replaces whatever id the client supplied with a freshly generated one.
    pub fn with_generated_id(mut self) -> Self {
        self.id = uuid::Uuid::new_v4().to_string();
        self
    }

    /// Builds the stored representation of this payload.
    pub fn into_event(self, created_at: DateTime<Utc>) -> Event {
        Event {
            id: self.id,
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_without_id_decodes_to_empty_id() {
        let payload: EventPayload = serde_json::from_str(
            r#"{"title":"Standup","description":"daily","start_time":"2024-01-01T09:00:00Z","end_time":"2024-01-01T09:15:00Z"}"#,
        )
        .unwrap();

        assert_eq!(payload.id, "");
        assert!(!payload.has_id());
        assert_eq!(payload.title, "Standup");
        assert_eq!(payload.description.as_deref(), Some("daily"));
        assert_eq!(
            payload.start_time.unwrap().to_rfc3339(),
            "2024-01-01T09:00:00+00:00"
        );
    }

    #[test]
    fn test_payload_requires_title() {
        let result = serde_json::from_str::<EventPayload>(r#"{"id":"abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_ignores_created_at() {
        let payload: EventPayload = serde_json::from_str(
            r#"{"id":"X","title":"Renamed","created_at":"1999-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert!(payload.has_id());
        assert_eq!(payload.start_time, None);
        assert_eq!(payload.end_time, None);
    }

    #[test]
    fn test_whitespace_id_counts_as_missing() {
        let payload = EventPayload {
            id: "   ".to_string(),
            title: "t".to_string(),
            ..Default::default()
        };
        assert!(!payload.has_id());
    }

    #[test]
    fn test_generated_id_overwrites_client_value() {
        let payload = EventPayload {
            id: "client-chosen".to_string(),
            title: "t".to_string(),
            ..Default::default()
        };

        let first = payload.clone().with_generated_id();
        let second = payload.with_generated_id();

        assert_ne!(first.id, "client-chosen");
        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_event_serializes_timestamps_as_rfc3339() {
        let created_at = "2024-01-01T08:00:00Z".parse().unwrap();
        let event = EventPayload {
            id: "e1".to_string(),
            title: "Standup".to_string(),
            ..Default::default()
        }
        .into_event(created_at);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], "e1");
        assert_eq!(json["created_at"], "2024-01-01T08:00:00Z");
        assert!(json["description"].is_null());
    }
}
