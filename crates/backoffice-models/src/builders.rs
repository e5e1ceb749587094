//! Builder patterns for subscription events.

use chrono::{DateTime, Utc};

use crate::entity::EntityType;
use crate::event::{EventType, SubscriptionEvent};
use crate::ids::EventId;

/// Builder for creating SubscriptionEvent instances with a fluent API.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    entity_name: EntityType,
    entity_id: i64,
    code: String,
    event_id: Option<EventId>,
    updated_properties: Vec<String>,
    timestamp: Option<DateTime<Utc>>,
    payload: serde_json::Value,
}

impl EventBuilder {
    /// Creates a new EventBuilder with required fields.
    pub fn new(entity_name: EntityType, entity_id: i64, code: impl Into<String>) -> Self {
        Self {
            entity_name,
            entity_id,
            code: code.into(),
            event_id: None,
            updated_properties: Vec::new(),
            timestamp: None,
            payload: serde_json::Value::Null,
        }
    }

    /// Sets the feed-assigned event id.
    pub fn event_id(mut self, id: impl Into<EventId>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    /// Adds an updated property.
    pub fn updated(mut self, property: impl Into<String>) -> Self {
        self.updated_properties.push(property.into());
        self
    }

    /// Sets the event timestamp (defaults to now).
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the payload.
    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Builds the SubscriptionEvent.
    pub fn build(self) -> SubscriptionEvent {
        SubscriptionEvent {
            event_id: self.event_id.unwrap_or_default(),
            entity_name: self.entity_name,
            entity_id: self.entity_id,
            entity_event_type: self.code,
            updated_properties: self.updated_properties,
            event_timestamp: Some(self.timestamp.unwrap_or_else(Utc::now)),
            payload: self.payload,
        }
    }
}

impl SubscriptionEvent {
    /// Creates a builder for a new event.
    pub fn builder(entity_name: EntityType, entity_id: i64, code: impl Into<String>) -> EventBuilder {
        EventBuilder::new(entity_name, entity_id, code)
    }

    /// Creates an insert event.
    pub fn inserted(entity_name: EntityType, entity_id: i64) -> Self {
        EventBuilder::new(entity_name, entity_id, EventType::Inserted.code()).build()
    }

    /// Creates an update event for the given properties.
    pub fn updated(entity_name: EntityType, entity_id: i64, properties: &[&str]) -> Self {
        properties
            .iter()
            .fold(
                EventBuilder::new(entity_name, entity_id, EventType::Updated.code()),
                |b, p| b.updated(*p),
            )
            .build()
    }

    /// Creates a delete event.
    pub fn deleted(entity_name: EntityType, entity_id: i64) -> Self {
        EventBuilder::new(entity_name, entity_id, EventType::Deleted.code()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_builder_basic() {
        let event = SubscriptionEvent::builder(EntityType::Placement, 7, "INSERTED").build();

        assert!(event.event_id.as_str().starts_with("evt-"));
        assert_eq!(event.entity_name, EntityType::Placement);
        assert_eq!(event.entity_id, 7);
        assert_eq!(event.event_type(), EventType::Inserted);
        assert!(event.event_timestamp.is_some());
    }

    #[test]
    fn test_event_builder_with_fields() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let event = SubscriptionEvent::builder(EntityType::Candidate, 1, "UPDATED")
            .event_id("evt-abc")
            .updated("status")
            .updated("owner")
            .at(ts)
            .payload(serde_json::json!({"source": "test"}))
            .build();

        assert_eq!(event.event_id.as_str(), "evt-abc");
        assert_eq!(event.updated_properties, vec!["status", "owner"]);
        assert_eq!(event.event_timestamp, Some(ts));
        assert_eq!(event.payload["source"], "test");
    }

    #[test]
    fn test_event_shortcuts() {
        assert_eq!(
            SubscriptionEvent::inserted(EntityType::JobOrder, 1).event_type(),
            EventType::Inserted
        );
        let updated = SubscriptionEvent::updated(EntityType::JobOrder, 1, &["title"]);
        assert_eq!(updated.event_type(), EventType::Updated);
        assert!(updated.touched("title"));
        assert_eq!(
            SubscriptionEvent::deleted(EntityType::JobOrder, 1).event_type(),
            EventType::Deleted
        );
    }
}
