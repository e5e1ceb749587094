//! Subscription events and their classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::ids::EventId;

/// Classification of an entity change event.
///
/// Mirrors the platform's entity event codes one to one; any code the
/// platform may add later lands in [`EventType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Entity was created.
    Inserted,
    /// Entity was modified.
    Updated,
    /// Entity was removed.
    Deleted,
    /// Code not recognised.
    Unknown,
}

impl EventType {
    /// Classifies a raw entity event code. Matching is exact.
    pub fn from_code(code: &str) -> Self {
        match code {
            "INSERTED" => EventType::Inserted,
            "UPDATED" => EventType::Updated,
            "DELETED" => EventType::Deleted,
            _ => EventType::Unknown,
        }
    }

    /// Returns the platform code for this type.
    pub fn code(&self) -> &'static str {
        match self {
            EventType::Inserted => "INSERTED",
            EventType::Updated => "UPDATED",
            EventType::Deleted => "DELETED",
            EventType::Unknown => "UNKNOWN",
        }
    }

    /// Returns true for the three recognised change kinds.
    pub fn is_known(&self) -> bool {
        !matches!(self, EventType::Unknown)
    }
}

/// A change notification delivered by the platform's subscription feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionEvent {
    /// Identifier assigned by the feed.
    #[serde(default)]
    pub event_id: EventId,

    /// Entity the event is about.
    pub entity_name: EntityType,

    /// Primary key of the entity.
    pub entity_id: i64,

    /// Raw event code (`INSERTED`, `UPDATED`, `DELETED`, ...).
    pub entity_event_type: String,

    /// Properties touched by an update.
    #[serde(default)]
    pub updated_properties: Vec<String>,

    /// When the change happened, if the feed reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_timestamp: Option<DateTime<Utc>>,

    /// Any additional data sent with the event.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl SubscriptionEvent {
    /// Creates an event with the given entity and raw code.
    pub fn new(entity_name: EntityType, entity_id: i64, entity_event_type: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            entity_name,
            entity_id,
            entity_event_type: entity_event_type.into(),
            updated_properties: Vec::new(),
            event_timestamp: Some(Utc::now()),
            payload: serde_json::Value::Null,
        }
    }

    /// Classifies the raw event code.
    pub fn event_type(&self) -> EventType {
        EventType::from_code(&self.entity_event_type)
    }

    /// Returns true if the update touched the given property.
    pub fn touched(&self, property: &str) -> bool {
        self.updated_properties.iter().any(|p| p == property)
    }
}
