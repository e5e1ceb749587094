//! Per-event traversal context.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use backoffice_models::{EntityType, EventType, FieldCatalog, RelatedFields, SubscriptionEvent, TraversalId};
use backoffice_persistence::EntityLookup;

use crate::helper::TaskHelper;

/// Classifies the raw code of an event.
pub fn classify(event: &SubscriptionEvent) -> EventType {
    event.event_type()
}

/// Builds the helper tasks use to reach related entities.
pub fn helper_for(
    event: &SubscriptionEvent,
    related_fields: Arc<RelatedFields>,
    lookup: Arc<dyn EntityLookup>,
) -> TaskHelper {
    TaskHelper::new(event.clone(), related_fields, lookup)
}

/// Context carried through a pipeline for one event.
///
/// Created per event and dropped after the run. Tasks share data through
/// [`EventTraverser::record`].
pub struct EventTraverser {
    id: TraversalId,
    event_type: EventType,
    helper: TaskHelper,
    results: BTreeMap<String, Value>,
}

impl EventTraverser {
    pub fn new(
        event: &SubscriptionEvent,
        related_fields: Arc<RelatedFields>,
        lookup: Arc<dyn EntityLookup>,
    ) -> Self {
        Self {
            id: TraversalId::new(),
            event_type: classify(event),
            helper: helper_for(event, related_fields, lookup),
            results: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &TraversalId {
        &self.id
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn event(&self) -> &SubscriptionEvent {
        self.helper.event()
    }

    pub fn helper(&self) -> &TaskHelper {
        &self.helper
    }

    pub fn helper_mut(&mut self) -> &mut TaskHelper {
        &mut self.helper
    }

    /// Stores a result under `key`, replacing any earlier value.
    pub fn record(&mut self, key: impl Into<String>, value: Value) {
        self.results.insert(key.into(), value);
    }

    pub fn result(&self, key: &str) -> Option<&Value> {
        self.results.get(key)
    }

    pub fn results(&self) -> &BTreeMap<String, Value> {
        &self.results
    }
}

/// How traversers for one entity type are set up.
#[derive(Debug, Clone, PartialEq)]
pub struct TraverserSpec {
    pub entity_type: EntityType,
    pub related_fields: Arc<RelatedFields>,
}

impl TraverserSpec {
    /// Takes the related fields from the catalog; entity types without an
    /// entry get an empty map.
    pub fn from_catalog(catalog: &FieldCatalog, entity_type: EntityType) -> Self {
        Self {
            entity_type,
            related_fields: Arc::new(catalog.related_fields(entity_type).cloned().unwrap_or_default()),
        }
    }

    pub fn traverser(&self, event: &SubscriptionEvent, lookup: Arc<dyn EntityLookup>) -> EventTraverser {
        EventTraverser::new(event, Arc::clone(&self.related_fields), lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use serde_json::json;

    struct NullLookup;

    impl EntityLookup for NullLookup {
        fn fetch(
            &self,
            _entity: EntityType,
            id: i64,
            _fields: &BTreeSet<String>,
        ) -> backoffice_persistence::Result<Value> {
            Ok(json!({"id": id}))
        }
    }

    #[test]
    fn test_classify_codes() {
        let event = |code: &str| SubscriptionEvent::new(EntityType::Placement, 1, code);
        assert_eq!(classify(&event("INSERTED")), EventType::Inserted);
        assert_eq!(classify(&event("UPDATED")), EventType::Updated);
        assert_eq!(classify(&event("DELETED")), EventType::Deleted);
        assert_eq!(classify(&event("inserted")), EventType::Unknown);
        assert_eq!(classify(&event("ARCHIVED")), EventType::Unknown);
    }

    #[test]
    fn test_spec_from_catalog() {
        let catalog = FieldCatalog::builtin();
        let spec = TraverserSpec::from_catalog(&catalog, EntityType::PlacementCommission);
        assert!(spec.related_fields.contains_key("placement_commission"));

        let spec = TraverserSpec::from_catalog(&catalog, EntityType::ClientContact);
        assert!(spec.related_fields.is_empty());
    }

    #[test]
    fn test_traverser_records_results() {
        let spec = TraverserSpec::from_catalog(&FieldCatalog::builtin(), EntityType::Placement);
        let event = SubscriptionEvent::updated(EntityType::Placement, 8, &["status"]);
        let mut traverser = spec.traverser(&event, Arc::new(NullLookup));

        assert_eq!(traverser.event_type(), EventType::Updated);
        assert_eq!(traverser.event().entity_id, 8);
        assert!(traverser.id().as_str().starts_with("trv-"));

        traverser.record("entity", json!({"id": 8}));
        traverser.record("entity", json!({"id": 8, "status": "Approved"}));
        assert_eq!(traverser.results().len(), 1);
        assert_eq!(traverser.result("entity").unwrap()["status"], "Approved");
    }
}
