//! Lookup helper handed to tasks.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use backoffice_models::{EntityType, RelatedFields, SubscriptionEvent};
use backoffice_persistence::EntityLookup;

use crate::error::{TaskError, TaskResult};

/// Gives tasks access to the event and to related entities.
///
/// Fetches are cached for the lifetime of one traversal, so tasks asking for
/// the same entity share a single lookup.
pub struct TaskHelper {
    event: SubscriptionEvent,
    related_fields: Arc<RelatedFields>,
    lookup: Arc<dyn EntityLookup>,
    cache: HashMap<(EntityType, i64, String), Value>,
}

impl TaskHelper {
    pub fn new(
        event: SubscriptionEvent,
        related_fields: Arc<RelatedFields>,
        lookup: Arc<dyn EntityLookup>,
    ) -> Self {
        Self {
            event,
            related_fields,
            lookup,
            cache: HashMap::new(),
        }
    }

    pub fn event(&self) -> &SubscriptionEvent {
        &self.event
    }

    /// Configured fields for a related-entity key.
    pub fn fields_for(&self, related: &str) -> Option<&BTreeSet<String>> {
        self.related_fields.get(related)
    }

    pub fn related_fields(&self) -> &RelatedFields {
        &self.related_fields
    }

    /// The entity the event is about, with the fields of its own catalog key.
    ///
    /// Without a catalog entry only `id` is fetched.
    pub fn entity(&mut self) -> TaskResult<Value> {
        let entity = self.event.entity_name;
        let id = self.event.entity_id;
        let key = entity.catalog_key();
        let fields = self
            .fields_for(key)
            .cloned()
            .unwrap_or_else(|| BTreeSet::from(["id".to_string()]));
        self.fetch_cached(entity, id, key, &fields)
    }

    /// Fetches a related entity with the fields configured under `related`.
    pub fn lookup(&mut self, entity: EntityType, id: i64, related: &str) -> TaskResult<Value> {
        let fields = self
            .fields_for(related)
            .cloned()
            .ok_or_else(|| TaskError::MissingFields(related.to_string()))?;
        self.fetch_cached(entity, id, related, &fields)
    }

    fn fetch_cached(
        &mut self,
        entity: EntityType,
        id: i64,
        related: &str,
        fields: &BTreeSet<String>,
    ) -> TaskResult<Value> {
        let key = (entity, id, related.to_string());
        if let Some(value) = self.cache.get(&key) {
            trace!(entity = %entity, id, related, "lookup cache hit");
            return Ok(value.clone());
        }
        let value = self.lookup.fetch(entity, id, fields)?;
        self.cache.insert(key, value.clone());
        Ok(value)
    }
}
